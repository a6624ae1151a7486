use dashboard_core::{
    status_label, ColumnKind, DomainViewModel, LoadState, NotifyLevel, SortDirection,
};

const MAX_CELL_WIDTH: usize = 28;

/// Text rendering of a view model for the terminal.
pub(crate) fn render(view: &DomainViewModel) -> String {
    let mut lines = Vec::new();

    let range = match (&view.start_date, &view.end_date) {
        (Some(start), Some(end)) => format!("{start} .. {end}"),
        (Some(start), None) => format!("from {start}"),
        (None, Some(end)) => format!("until {end}"),
        (None, None) => "server default range".to_string(),
    };
    lines.push(format!(
        "== {} | {range}{} ==",
        view.domain,
        loading_suffix(view.loading)
    ));

    let summary = view.summary;
    lines.push(format!(
        "Total {} | Success {} | Failure {} | Others {}",
        summary.total, summary.success_count, summary.failure_count, summary.others_count
    ));

    if !view.chips.is_empty() {
        let chips: Vec<String> = view
            .chips
            .iter()
            .map(|chip| format!("[{}: {} x]", chip.category, chip.value))
            .collect();
        lines.push(format!("Filters: {}", chips.join(" ")));
    }

    if let Some(category) = &view.active_category {
        let options: Vec<String> = view
            .active_options
            .iter()
            .map(|option| {
                let mark = if option.selected { 'x' } else { ' ' };
                format!("[{mark}] {}", option.value)
            })
            .collect();
        if options.is_empty() {
            lines.push(format!("{category}: no options"));
        } else {
            lines.push(format!("{category}: {}", options.join("  ")));
        }
    }

    lines.extend(table(view));

    let window = view.pagination;
    let mut footer = format!(
        "Page {}/{} | {} per page | {} results",
        window.page,
        window.total_items.div_ceil(window.per_page.max(1)).max(1),
        window.per_page,
        window.total_items
    );
    if let Some(sort) = &view.sort {
        let arrow = match sort.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        footer.push_str(&format!(" | sorted by {} {arrow}", sort.column));
    }
    lines.push(footer);

    for graph in &view.graphs {
        let body = match (graph.state, &graph.data) {
            (LoadState::Completed, Some(data)) => truncate(&data.to_string(), 72),
            (state, _) => format!("{state:?}").to_lowercase(),
        };
        lines.push(format!("graph {}: {body}", graph.item_key));
    }

    lines.join("\n")
}

pub(crate) fn notification(level: NotifyLevel, message: &str) -> String {
    let tag = match level {
        NotifyLevel::Info => "info",
        NotifyLevel::Warning => "warning",
        NotifyLevel::Error => "error",
    };
    format!("[{tag}] {message}")
}

fn table(view: &DomainViewModel) -> Vec<String> {
    if view.rows.is_empty() {
        return vec!["(no results)".to_string()];
    }
    let cells: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            view.columns
                .iter()
                .map(|column| {
                    let raw = row.text(&column.key);
                    let text = match column.kind {
                        ColumnKind::Status if !raw.is_empty() => status_label(&raw),
                        _ => raw,
                    };
                    truncate(&text, MAX_CELL_WIDTH)
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(
        view.columns.iter().map(|c| c.label.as_str()).collect(),
    )];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines
}

fn loading_suffix(state: LoadState) -> &'static str {
    match state {
        LoadState::Loading => " | loading...",
        LoadState::Errored => " | last fetch failed",
        LoadState::Idle | LoadState::Completed => "",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
