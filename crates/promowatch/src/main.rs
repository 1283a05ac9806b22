use std::path::{Path, PathBuf};

use promowatch_core::{
    config::RuntimeConfig,
    filters::{FilterStore, DEFAULT_FILTERS_FILE},
    logging,
};

const ENV_FILE: &str = ".env";

#[tokio::main]
async fn main() -> Result<(), promowatch_core::Error> {
    logging::init("promowatch")?;

    // A malformed identity is fatal here; later reloads fall back to the
    // previous config instead.
    let cfg = RuntimeConfig::load(Path::new(ENV_FILE))?;

    let mut filters = FilterStore::new(DEFAULT_FILTERS_FILE);
    filters.load()?;

    promowatch_telegram::router::run_polling(cfg, filters, PathBuf::from(ENV_FILE))
        .await
        .map_err(|e| promowatch_core::Error::External(format!("telegram relay failed: {e}")))?;

    Ok(())
}
