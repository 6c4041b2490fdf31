use xmltree::{Element, XMLNode};

fn name_matches(raw_name: &str, target: &str) -> bool {
    if raw_name.eq_ignore_ascii_case(target) {
        return true;
    }

    raw_name
        .rsplit_once(':')
        .map(|(_, suffix)| suffix.eq_ignore_ascii_case(target))
        .unwrap_or(false)
}

/// Get child element by name (case-insensitive)
pub(crate) fn get_child_ci<'a>(el: &'a Element, name: &str) -> Option<&'a Element> {
    el.children
        .iter()
        .filter_map(|n| n.as_element())
        .find(|c| name_matches(&c.name, name))
}

/// Get mutable child element by name (case-insensitive)
pub(crate) fn get_mut_child_ci<'a>(el: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    el.children
        .iter_mut()
        .filter_map(|n| n.as_mut_element())
        .find(|c| name_matches(&c.name, name))
}

/// Trimmed text of a named child, `None` when missing or empty
pub(crate) fn child_text(el: &Element, name: &str) -> Option<String> {
    get_child_ci(el, name)
        .and_then(|e| e.get_text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn is_named(el: &Element, name: &str) -> bool {
    name_matches(&el.name, name)
}

/// Build `<name>text</name>`
pub(crate) fn text_element(name: &str, text: &str) -> Element {
    let mut elem = Element::new(name);
    elem.children.push(XMLNode::Text(text.to_string()));
    elem
}

/// Replace the text of a named child, creating the child if needed
pub(crate) fn set_child_text(el: &mut Element, name: &str, text: &str) {
    match get_mut_child_ci(el, name) {
        Some(child) => {
            child.children.clear();
            child.children.push(XMLNode::Text(text.to_string()));
        }
        None => el.children.push(XMLNode::Element(text_element(name, text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lookup_ignores_case_and_prefix() {
        let root = Element::parse(Cursor::new(
            r#"<root xmlns:x="urn:x"><DHCPD><lan/></DHCPD><x:interfaces/></root>"#,
        ))
        .unwrap();

        assert!(get_child_ci(&root, "dhcpd").is_some());
        assert!(get_child_ci(&root, "interfaces").is_some());
        assert!(get_child_ci(&root, "revision").is_none());
    }

    #[test]
    fn test_child_text_trims_and_filters_empty() {
        let root = Element::parse(Cursor::new(
            "<staticmap><mac> aa:bb:cc:dd:ee:ff </mac><hostname></hostname></staticmap>",
        ))
        .unwrap();

        let mac = child_text(&root, "mac");
        assert_eq!(mac.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(child_text(&root, "hostname"), None);
        assert_eq!(child_text(&root, "descr"), None);
    }

    #[test]
    fn test_set_child_text_replaces_or_creates() {
        let mut root = Element::parse(Cursor::new("<revision><time>1</time></revision>")).unwrap();

        set_child_text(&mut root, "time", "2");
        set_child_text(&mut root, "description", "changed");

        assert_eq!(child_text(&root, "time").as_deref(), Some("2"));
        assert_eq!(child_text(&root, "description").as_deref(), Some("changed"));
        assert_eq!(root.children.len(), 2);
    }
}
