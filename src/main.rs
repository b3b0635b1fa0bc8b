use std::process;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use config::{Config, Environment, File};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tera::Tera;

use pushkind_blog::db::establish_connection_pool;
use pushkind_blog::models::config::ServerConfig;
use pushkind_blog::repository::DieselRepository;
use pushkind_blog::routes;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let secret_key = match Key::try_from(server_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::error!("Invalid secret, it must be at least 64 bytes long: {e}");
            process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            process::exit(1);
        }
    };

    match pool.get() {
        Ok(mut conn) => {
            if let Err(e) = conn.run_pending_migrations(MIGRATIONS) {
                log::error!("Failed to run migrations: {e}");
                process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to get a connection for migrations: {e}");
            process::exit(1);
        }
    }

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(tera) => web::Data::new(tera),
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            process::exit(1);
        }
    };

    let repo = web::Data::new(DieselRepository::new(pool));
    let message_framework =
        FlashMessagesFramework::builder(CookieMessageStore::builder(secret_key.clone()).build())
            .build();
    let secure_cookies = server_config.secure_cookies;
    let bind_to = (server_config.address.clone(), server_config.port);

    log::info!("Starting server at http://{}:{}", bind_to.0, bind_to.1);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(secure_cookies)
                    .build(),
            )
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .app_data(repo.clone())
            .app_data(tera.clone())
            .configure(routes::configure)
    })
    .bind(bind_to)?
    .run()
    .await
}
