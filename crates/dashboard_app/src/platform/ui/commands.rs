use anyhow::{anyhow, bail, Context};
use dashboard_core::{Msg, SelectMode, SortDirection, SummaryShortcut};

pub(crate) const HELP: &str = "\
commands:
  category <name>              offer the options of a facet
  toggle <category> <value>    add or remove a pending value
  select <category> <value>    make a value the only pending one
  commit                       apply the pending selection
  remove <category> <value>    drop an applied value
  clear                        drop every filter
  show [successes|failures|others|all]
                               status shortcut, or redraw without one
  sort <column> [asc|desc]     sort the table; `sort off` to unsort
  page <n> | per-page <n>      move through the results
  dates <start> <end>          fetch another date range (YYYY-MM-DD)
  refresh                      fetch the current range again
  graph <item>                 load graph data for one result
  url                          print the current location
  back | forward               walk the location history
  help | quit";

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Dispatch(Msg),
    Redraw,
    PrintUrl,
    Back,
    Forward,
    Help,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> anyhow::Result<Command> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Redraw);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("category", [name]) => Command::Dispatch(Msg::CategoryActivated(name.to_string())),
        ("toggle", [category, value @ ..]) if !value.is_empty() => {
            Command::Dispatch(Msg::OptionToggled {
                category: category.to_string(),
                value: value.join(" "),
                mode: SelectMode::Multi,
            })
        }
        ("select", [category, value @ ..]) if !value.is_empty() => {
            Command::Dispatch(Msg::OptionToggled {
                category: category.to_string(),
                value: value.join(" "),
                mode: SelectMode::Single,
            })
        }
        ("commit", []) => Command::Dispatch(Msg::FiltersCommitted),
        ("remove", [category, value @ ..]) if !value.is_empty() => {
            Command::Dispatch(Msg::FilterRemoved {
                category: category.to_string(),
                value: value.join(" "),
            })
        }
        ("clear", []) => Command::Dispatch(Msg::FiltersCleared),
        ("show", []) => Command::Redraw,
        ("show", [which]) => {
            let shortcut = SummaryShortcut::parse(which)
                .ok_or_else(|| anyhow!("unknown shortcut {which:?}"))?;
            Command::Dispatch(Msg::ShortcutClicked(shortcut))
        }
        ("sort", ["off"]) => Command::Dispatch(Msg::SortCleared),
        ("sort", [column]) => Command::Dispatch(Msg::SortChanged {
            column: column.to_string(),
            direction: SortDirection::Asc,
        }),
        ("sort", [column, direction]) => {
            let direction = SortDirection::parse(direction)
                .ok_or_else(|| anyhow!("sort direction must be asc or desc"))?;
            Command::Dispatch(Msg::SortChanged {
                column: column.to_string(),
                direction,
            })
        }
        ("page", [n]) => Command::Dispatch(Msg::PageChanged(parse_number(n)?)),
        ("per-page", [n]) => Command::Dispatch(Msg::PageSizeChanged(parse_number(n)?)),
        ("dates", [start, end]) => Command::Dispatch(Msg::DateRangeChanged {
            start: start.to_string(),
            end: end.to_string(),
        }),
        ("refresh", []) => Command::Dispatch(Msg::RefreshRequested),
        ("graph", [item_key]) => Command::Dispatch(Msg::GraphRequested {
            item_key: item_key.to_string(),
        }),
        ("url", []) => Command::PrintUrl,
        ("back", []) => Command::Back,
        ("forward", []) => Command::Forward,
        ("help", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => bail!("cannot understand {line:?}; type `help`"),
    };
    Ok(command)
}

fn parse_number(raw: &str) -> anyhow::Result<usize> {
    raw.parse()
        .with_context(|| format!("{raw:?} is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_commands_map_to_messages() {
        assert_eq!(
            parse_command("toggle platform AWS").unwrap(),
            Command::Dispatch(Msg::OptionToggled {
                category: "platform".to_string(),
                value: "AWS".to_string(),
                mode: SelectMode::Multi,
            })
        );
        assert_eq!(
            parse_command("remove benchmark node density").unwrap(),
            Command::Dispatch(Msg::FilterRemoved {
                category: "benchmark".to_string(),
                value: "node density".to_string(),
            })
        );
        assert_eq!(
            parse_command("  commit ").unwrap(),
            Command::Dispatch(Msg::FiltersCommitted)
        );
    }

    #[test]
    fn paging_and_sorting_commands() {
        assert_eq!(
            parse_command("page 0").unwrap(),
            Command::Dispatch(Msg::PageChanged(0))
        );
        assert_eq!(
            parse_command("sort startDate desc").unwrap(),
            Command::Dispatch(Msg::SortChanged {
                column: "startDate".to_string(),
                direction: SortDirection::Desc,
            })
        );
        assert!(parse_command("sort startDate sideways").is_err());
        assert!(parse_command("per-page many").is_err());
    }

    #[test]
    fn show_takes_an_optional_shortcut() {
        assert_eq!(parse_command("show").unwrap(), Command::Redraw);
        assert_eq!(
            parse_command("show failures").unwrap(),
            Command::Dispatch(Msg::ShortcutClicked(SummaryShortcut::Failures))
        );
        assert!(parse_command("show nothing").is_err());
    }

    #[test]
    fn unknown_or_incomplete_input_is_an_error() {
        assert!(parse_command("toggle platform").is_err());
        assert!(parse_command("launch").is_err());
        assert_eq!(parse_command("").unwrap(), Command::Redraw);
    }
}
