mod cli;

use anyhow::Result;
use showcase_engine::device::GpuInit;
use showcase_engine::logging::{LoggingConfig, init_logging};
use showcase_engine::scene::{FrameDriver, Scene};
use showcase_engine::window::{Runtime, RuntimeConfig};

use cli::CliCommand;

fn main() -> Result<()> {
    let options = match cli::parse(std::env::args().skip(1))? {
        CliCommand::Run(options) => options,
        CliCommand::List => {
            for scene in Scene::ALL {
                println!("{scene}");
            }
            return Ok(());
        }
        CliCommand::Help => {
            print!("{}", cli::USAGE);
            return Ok(());
        }
    };

    init_logging(LoggingConfig {
        env_filter: options.log_filter.clone(),
        ..Default::default()
    });

    log::info!("showing `{}`", options.scene);

    let config = RuntimeConfig {
        title: format!("primitive showcase: {}", options.scene),
        ..Default::default()
    };
    let gpu_init = GpuInit {
        prefer_srgb: options.prefer_srgb,
        ..Default::default()
    };

    Runtime::run(config, gpu_init, FrameDriver::new(options.scene))
}
