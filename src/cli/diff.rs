use crate::ConfigTree;
use anyhow::{Context, Result};

/// Unified diff of the emitted config.xml before and after a pipeline run
pub(crate) fn config_diff(before: &ConfigTree, after: &ConfigTree) -> Result<String> {
    let before_str = render(before).context("Failed to render original config")?;
    let after_str = render(after).context("Failed to render modified config")?;

    if before_str == after_str {
        return Ok(String::new());
    }

    let diff = similar::TextDiff::from_lines(&before_str, &after_str);
    Ok(diff
        .unified_diff()
        .context_radius(3)
        .header("config.xml", "config.xml (modified)")
        .to_string())
}

fn render(tree: &ConfigTree) -> Result<String> {
    let mut buf = Vec::new();
    tree.write(&mut buf)?;
    String::from_utf8(buf).context("config.xml is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticMapping;
    use std::io::Cursor;

    const XML: &str = r#"<?xml version="1.0"?>
<pfsense>
  <dhcpd>
    <lan>
      <staticmap>
        <mac>aa:bb:cc:dd:ee:01</mac>
        <ipaddr>192.168.1.10</ipaddr>
      </staticmap>
    </lan>
  </dhcpd>
</pfsense>
"#;

    #[test]
    fn test_no_changes_renders_empty() {
        let tree = ConfigTree::parse(Cursor::new(XML)).unwrap();
        assert_eq!(config_diff(&tree, &tree.clone()).unwrap(), "");
    }

    #[test]
    fn test_added_mapping_shows_in_diff() {
        let before = ConfigTree::parse(Cursor::new(XML)).unwrap();
        let mut after = before.clone();
        let nas = StaticMapping::new("aa:bb:cc:dd:ee:02", "192.168.1.11", "nas", "");
        after.scope_mut("lan").unwrap().static_maps.push(nas);

        let diff = config_diff(&before, &after).unwrap();
        assert!(diff.contains("--- config.xml"));
        assert!(diff.contains("+++ config.xml (modified)"));

        let mut added = diff.lines().filter(|l| l.starts_with('+'));
        assert!(added.any(|l| l.contains("<ipaddr>192.168.1.11</ipaddr>")));
        let mut removed = diff.lines().filter(|l| l.starts_with('-'));
        assert!(!removed.any(|l| l.contains("192.168.1.10")));
    }
}
