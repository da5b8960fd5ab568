pub mod decision_tree;
pub mod knn;
pub mod logistic_regression;
pub mod naive_bayes;
pub mod utils;

pub mod classifier_trait;
pub mod factory;

pub use classifier_trait::ClassifierModel;
pub use decision_tree::{gini_impurity, DecisionTree, DecisionTreeClassifier, TreeNode};
pub use knn::KNNClassifier;
pub use logistic_regression::LogisticRegression;
pub use naive_bayes::NaiveBayesClassifier;
