use anyhow::Result;
use query_defs::{FileItem, Loader, QueryType, classify};

/// Resolve `name` to the matched item plus its text and type.
async fn find_query(loader: &dyn Loader, name: &str) -> Result<(FileItem, String, QueryType)> {
    let item = loader.find_file(name).await?;
    let text = loader.get_text_for(&item).await?;
    let kind = classify(&item.name, Some(&text))?;
    Ok((item, text, kind))
}

pub async fn run(loader: &dyn Loader, name: &str, raw: bool) -> Result<()> {
    let (item, text, kind) = find_query(loader, name).await?;

    if raw {
        print!("{text}");
        return Ok(());
    }

    println!("Name:   {}", item.name);
    println!("Type:   {kind}");
    let uri = loader.raw_repo_uri();
    if !uri.is_empty() {
        println!("Source: {uri}");
    }
    println!();
    print!("{text}");

    Ok(())
}
