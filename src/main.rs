use pov_framing::alignment::{Aligner, EngineKind, FullFrameAligner, PassthroughEngine};
use pov_framing::config::{load_config, load_learning_settings};
use pov_framing::demo::DemoRecorder;
use pov_framing::error::Error;
use pov_framing::repository::FsRepository;
use pov_framing::server::Server;
use pov_framing::store::LearningDataStore;
use pov_framing::transport::TcpTransport;
use pov_framing::validation::{RoiFeatureClassifier, ValidationAggregator};
use pov_framing::ModeCoordinator;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> Error {
    Error::Config("usage: pov_server <server_config.json>".to_string())
}

fn run() -> Result<(), Error> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let settings = load_learning_settings(&config.learning_settings)?;

    let aligner: Box<dyn Aligner> = match config.engine {
        EngineKind::FullFrame => Box::new(FullFrameAligner::new(PassthroughEngine)),
        EngineKind::FeatureMatching => {
            return Err(Error::Config(
                "no feature-matching engine is built into pov_server; \
                 embed the library and provide a FeatureMatchingEngine"
                    .to_string(),
            ))
        }
    };

    let repository = FsRepository::open(&config.repository_dir, config.work_width)?;
    let store = LearningDataStore::new(Box::new(repository), settings.sights.clone());
    let validator = ValidationAggregator::new(Box::new(RoiFeatureClassifier::new(
        settings.recognition_selector.uncertainty,
    )));
    let coordinator = ModeCoordinator::new(store, aligner, validator, settings.tolerance);

    log::info!("Launching server");
    let transport = TcpTransport::bind(config.listen.as_str())?;
    let mut server = Server::new(transport, coordinator);
    if let Some(dir) = &config.demo_dir {
        server = server.with_demo(DemoRecorder::new(dir)?);
    }
    server.run()
}
