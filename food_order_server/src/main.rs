use dotenvy::dotenv;
use food_order_server::{cli::handle_command_line_args, config::ServerConfig, server::run_server};
use log::*;

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() {
        return;
    }
    let config = match ServerConfig::from_env_or_default() {
        Ok(c) => c,
        Err(e) => {
            error!("🚀️ Cannot start the server. {e}");
            eprintln!("{e}");
            std::process::exit(1);
        },
    };

    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    match run_server(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}
