use query_defs::{FileItem, QueryType};

const MAX_NAME_WIDTH: usize = 35;
const LINE_BUDGET: usize = 100;

pub fn print_file_table(items: &[FileItem]) {
    if items.is_empty() {
        return;
    }

    let groups = group_by_type(items);
    let mut first = true;

    for (kind, entries) in &groups {
        if !first {
            println!();
        }
        first = false;

        let name_width = entries
            .iter()
            .map(|item| item.name.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_NAME_WIDTH);

        let url_budget = LINE_BUDGET.saturating_sub(2 + name_width + 2);

        println!("{} ({})", type_label(*kind), entries.len());

        for entry in entries {
            let name = truncate(&entry.name, name_width);
            let url = truncate(&entry.download_url, url_budget);
            println!("  {:<width$}  {}", name, url, width = name_width);
        }
    }

    println!("\n{} queries", items.len());
}

fn type_label(kind: QueryType) -> &'static str {
    match kind {
        QueryType::Sparql => "SPARQL",
        QueryType::Tpf => "TPF",
        QueryType::Json => "JSON",
    }
}

fn type_sort_key(kind: QueryType) -> u8 {
    match kind {
        QueryType::Sparql => 0,
        QueryType::Tpf => 1,
        QueryType::Json => 2,
    }
}

/// Group listed items by suffix type. Listings only hold items with a
/// recognized suffix, so nothing is left ungrouped.
fn group_by_type(items: &[FileItem]) -> Vec<(QueryType, Vec<&FileItem>)> {
    let mut groups: Vec<(QueryType, Vec<&FileItem>)> = Vec::new();

    for item in items.iter() {
        let Some(kind) = item.query_type() else {
            continue;
        };
        if let Some(group) = groups.iter_mut().find(|(k, _)| *k == kind) {
            group.1.push(item);
        } else {
            groups.push((kind, vec![item]));
        }
    }

    groups.sort_by_key(|(k, _)| type_sort_key(*k));
    groups
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{truncated}…")
    }
}
