use crate::config::ModelType;
use crate::models::classifier_trait::Classifier;
use crate::models::forest::RandomForestClassifier;
use crate::models::gbdt::GradientBoosting;
use crate::models::logistic::LogisticRegression;
use crate::models::sgd::SgdClassifier;

/// Build a boxed classifier from a `ModelType`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model(model_type: &ModelType) -> Box<dyn Classifier> {
    match model_type {
        ModelType::RandomForest {
            n_estimators,
            max_depth,
            min_samples_split,
            random_state,
        } => Box::new(RandomForestClassifier::new(
            *n_estimators,
            *max_depth,
            *min_samples_split,
            *random_state,
        )),
        ModelType::LogisticRegression {
            max_iter,
            learning_rate,
            l2,
        } => Box::new(LogisticRegression::new(*max_iter, *learning_rate, *l2)),
        ModelType::Sgd {
            epochs,
            learning_rate,
            l2,
            random_state,
        } => Box::new(SgdClassifier::new(
            *epochs,
            *learning_rate,
            *l2,
            *random_state,
        )),
        ModelType::Gbdt {
            max_depth,
            num_boost_round,
            learning_rate,
        } => Box::new(GradientBoosting::new(
            *max_depth,
            *num_boost_round,
            *learning_rate,
        )),
    }
}
