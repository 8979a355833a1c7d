use anyhow::Result;
use query_defs::{Loader, QueryType};

use super::format;

pub async fn run(loader: &dyn Loader, kind_filter: Option<QueryType>, json: bool) -> Result<()> {
    let mut items = loader.fetch_files().await?;

    if let Some(kind) = kind_filter {
        items.retain(|item| item.query_type() == Some(kind));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if items.is_empty() {
        println!("No queries found.");
    } else {
        format::print_file_table(&items);
    }

    Ok(())
}
