pub mod classifier_trait;
pub mod factory;
pub mod forest;
pub mod gbdt;
pub mod logistic;
pub mod sgd;

pub use classifier_trait::Classifier;
pub use factory::build_model;
