use anyhow::Result;
use query_defs::Loader;

pub async fn run(loader: &dyn Loader) -> Result<()> {
    let meta = loader.metadata().await?;

    if meta.is_empty() {
        println!("No metadata published by this source.");
        return Ok(());
    }

    let fields = [
        ("Title", &meta.title),
        ("Description", &meta.description),
        ("Contact", &meta.contact_name),
        ("Contact URL", &meta.contact_url),
        ("Licence", &meta.licence_url),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{:<12} {value}", format!("{label}:"));
        }
    }

    Ok(())
}
