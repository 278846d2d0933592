use anyhow::Result;

use rigview::RigViewApp;

fn main() -> Result<()> {
    env_logger::init();

    log::info!("starting rigview");
    RigViewApp::new()?.run()
}
