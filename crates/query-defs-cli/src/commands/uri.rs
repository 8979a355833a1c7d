use anyhow::Result;
use query_defs::Loader;

pub fn run(loader: &dyn Loader) -> Result<()> {
    let uri = loader.raw_repo_uri();
    if uri.is_empty() {
        eprintln!("source has no provenance URI");
    } else {
        println!("{uri}");
    }
    Ok(())
}
