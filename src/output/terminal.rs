//! Terminal output utilities.

use crate::models::{SubnetGroupState, Tags};
use colored::Colorize;
use itertools::Itertools;

/// Quote a value; `None` renders as a bare `-`.
pub fn quoted(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "-".to_string(),
    }
}

fn format_tags(tags: &Tags) -> String {
    tags.iter().map(|(k, v)| format!("{k}={v}")).join(", ")
}

/// Render a state as `attribute = "value"` lines.
pub fn format_state(state: &SubnetGroupState) -> Vec<String> {
    const WIDTH: usize = 12;
    let attr = |name: &str| format!("{name:<WIDTH$}");

    vec![
        format!("{} = {}", attr("id"), quoted(state.id.as_deref())),
        format!("{} = {}", attr("arn"), quoted(Some(state.arn.as_str()))),
        format!("{} = {}", attr("name"), quoted(Some(state.name.as_str()))),
        format!("{} = {}", attr("name_prefix"), quoted(state.name_prefix.as_deref())),
        format!("{} = {}", attr("description"), quoted(Some(state.description.as_str()))),
        format!(
            "{} = [{}]",
            attr("subnet_ids"),
            state.subnet_ids.iter().map(|s| quoted(Some(s.as_str()))).join(", ")
        ),
        format!("{} = {}", attr("vpc_id"), quoted(state.vpc_id.as_deref())),
        format!("{} = {{{}}}", attr("tags"), format_tags(&state.tags)),
        format!("{} = {{{}}}", attr("tags_all"), format_tags(&state.tags_all)),
    ]
}

/// Print a state to stdout.
pub fn print_state(state: &SubnetGroupState) {
    match &state.id {
        Some(id) => println!("{} {}", "memorydb_subnet_group".bold(), id.green()),
        None => println!("{} {}", "memorydb_subnet_group".bold(), "(absent)".red()),
    }
    for line in format_state(state) {
        println!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted() {
        assert_eq!(quoted(Some("subnet-a")), "\"subnet-a\"");
        assert_eq!(quoted(Some("say \"hi\"")), "\"say \\\"hi\\\"\"");
        assert_eq!(quoted(None), "-");
    }

    #[test]
    fn test_format_state() {
        let mut state = SubnetGroupState::with_id("cache-a");
        state.subnet_ids = vec!["subnet-b".to_string(), "subnet-a".to_string()];
        state.tags.insert("app".to_string(), "api".to_string());
        let lines = format_state(&state);
        assert_eq!(lines[0], "id           = \"cache-a\"");
        assert_eq!(lines[5], "subnet_ids   = [\"subnet-b\", \"subnet-a\"]");
        assert_eq!(lines[3], "name_prefix  = -");
        assert_eq!(lines[7], "tags         = {app=api}");
    }
}
