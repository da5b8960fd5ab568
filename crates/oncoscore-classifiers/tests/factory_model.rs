use oncoscore_classifiers::config::{ModelKind, ModelType};
use oncoscore_classifiers::math::Array2;
use oncoscore_classifiers::models::factory;
use oncoscore_classifiers::ClassifierError;

fn toy_data() -> (Array2<f64>, Vec<i32>) {
    let x = Array2::from_shape_vec(
        (6, 2),
        vec![
            1.0, 0.0, // class 1
            0.0, 1.0, // class 0
            1.0, 0.1, // class 1
            0.0, 0.9, // class 0
            1.1, 0.0, // class 1
            0.0, 1.2, // class 0
        ],
    )
    .expect("failed to create feature matrix");
    (x, vec![1, 0, 1, 0, 1, 0])
}

#[test]
fn test_factory_builds_and_predicts_every_model() {
    let (x, y) = toy_data();

    for model_type in ModelType::all_defaults() {
        let kind = model_type.kind();
        let mut model = factory::build_model(model_type).expect("valid default parameters");
        assert_eq!(model.name(), kind.display_name());
        assert!(!model.is_trained());

        model.fit(&x, &y).expect("fit failed");
        assert!(model.is_trained());

        let probs = model.predict_proba(&x).expect("predict_proba failed");
        assert_eq!(probs.len(), x.nrows());
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));

        let preds = model.predict(&x).expect("predict failed");
        assert_eq!(preds.len(), x.nrows());
    }
}

#[test]
fn test_factory_rejects_invalid_hyper_parameters() {
    let bad = [
        ModelType::KNN { k: 0 },
        ModelType::DecisionTree {
            max_depth: 0,
            min_samples_split: 2,
        },
        ModelType::DecisionTree {
            max_depth: 3,
            min_samples_split: 0,
        },
        ModelType::LogisticRegression {
            learning_rate: 0.0,
            max_iterations: 10,
            tolerance: None,
        },
        ModelType::LogisticRegression {
            learning_rate: 0.1,
            max_iterations: 0,
            tolerance: None,
        },
        ModelType::LogisticRegression {
            learning_rate: 0.1,
            max_iterations: 10,
            tolerance: Some(-1.0),
        },
    ];
    for model_type in bad {
        assert!(matches!(
            factory::build_model(model_type),
            Err(ClassifierError::InvalidInput(_))
        ));
    }
}

#[test]
fn test_model_names_parse() {
    assert_eq!("knn".parse::<ModelKind>().unwrap(), ModelKind::KNN);
    assert_eq!(
        "Decision-Tree".parse::<ModelKind>().unwrap(),
        ModelKind::DecisionTree
    );
    assert_eq!(
        "logreg".parse::<ModelType>().unwrap(),
        ModelType::default_for(ModelKind::LogisticRegression)
    );
    assert!("svm".parse::<ModelKind>().is_err());

    for kind in ModelKind::ALL {
        assert_eq!(kind.short_name().parse::<ModelKind>().unwrap(), kind);
    }
}

#[test]
fn test_model_type_json_round_trip() {
    let json = r#"{"LogisticRegression":{"learning_rate":0.05,"max_iterations":200}}"#;
    let parsed: ModelType = serde_json::from_str(json).unwrap();
    assert_eq!(
        parsed,
        ModelType::LogisticRegression {
            learning_rate: 0.05,
            max_iterations: 200,
            tolerance: None,
        }
    );

    let bayes: ModelType = serde_json::from_str(r#""NaiveBayes""#).unwrap();
    assert_eq!(bayes, ModelType::NaiveBayes);
}
