pub mod schema;
pub mod server;
pub mod settings;

pub use server::{load_config, ServerConfig};
pub use settings::{load_learning_settings, LearningSettings, RecognitionSelector};
