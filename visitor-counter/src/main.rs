use {
    std::{path::PathBuf, process::exit},
    serde_json::Value,
    tracing::{Level, info, error},
    tracing_subscriber::FmtSubscriber,
    clap::{Parser, Subcommand},
    lambda_runtime::{run, service_fn, Error, LambdaEvent},
    visitor_counter::{
        CounterHandler,
        config::{CounterConfig, store_from_config},
        http::serve,
    },
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Runs the function runtime loop when no command is given.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Increment the counter once and print the response.
    Invoke {
        config_file: PathBuf,
    },
    /// Serve the counter over http.
    Serve {
        config_file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let result = match args.command {
        None => {
            FmtSubscriber::builder()
                .with_max_level(Level::INFO)
                .with_ansi(false)
                .without_time()
                .init();
            run_function().await
        },
        Some(command) => {
            FmtSubscriber::builder().with_max_level(Level::INFO).init();
            run_command(command).await
        },
    };

    if let Err(err) = result {
        error!("{err}");
        exit(1);
    }
}

async fn run_function() -> Result<(), Error> {
    let config = CounterConfig::from_env();
    let handler = handler_from_config(&config).await?;
    info!("starting function for counter {:?}", handler.key());

    run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move {
            handler.handle(event.payload).await.map_err(Error::from)
        }
    })).await
}

async fn run_command(command: Command) -> Result<(), Error> {
    match command {
        Command::Invoke { config_file } => {
            let config = load_config(config_file).await?;
            let handler = handler_from_config(&config).await?;
            let response = handler.handle(Value::Null).await?;
            println!("{}", serde_json::to_string(&response)?);
        },
        Command::Serve { config_file } => {
            let config = load_config(config_file).await?;
            let handler = handler_from_config(&config).await?;
            serve(config.http_port(), handler).await?;
        },
    }

    Ok(())
}

async fn load_config(config_file: PathBuf) -> Result<CounterConfig, Error> {
    let config_path = std::env::current_dir()?.join(config_file);
    info!("Loading config from {config_path:?}");
    Ok(CounterConfig::load(config_path).await?)
}

async fn handler_from_config(config: &CounterConfig) -> Result<CounterHandler, Error> {
    let store = store_from_config(&config.store).await?;
    Ok(CounterHandler::new(store, config.key.clone()))
}
