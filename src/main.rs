use commerce_orders::{build_server, create_pool, run_migrations, Settings};
use dotenvy::dotenv;

fn to_io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env().map_err(to_io_error)?;

    let pool = create_pool(&settings.database_url, settings.pool_max_size).map_err(to_io_error)?;
    run_migrations(&pool).map_err(to_io_error)?;

    log::info!("Starting server at http://{}:{}", settings.host, settings.port);

    build_server(pool, &settings.host, settings.port)?.await
}
