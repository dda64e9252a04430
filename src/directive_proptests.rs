use super::*;
use proptest::prelude::*;

/// URL に使える文字列
fn url_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,10}\\.[a-z]{2,3}/[a-zA-Z0-9_-]{1,20}\\.md".prop_map(|s| format!("https://{s}"))
}

/// 保存先パスのセグメント
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,12}"
}

proptest! {
    /// 同じ入力からは常に同じ結果が得られる
    #[test]
    fn prop_parse_is_pure(
        url in url_strategy(),
        dir in segment_strategy(),
        file in segment_strategy(),
        icon in proptest::option::of(segment_strategy()),
        hide in proptest::collection::vec(segment_strategy(), 0..4),
    ) {
        let mut text = format!("!import url({url}) path({dir}/{file}.md)");
        if let Some(icon) = &icon {
            text.push_str(&format!(" icon({icon})"));
        }
        if !hide.is_empty() {
            text.push_str(&format!(" hide({})", hide.join(",")));
        }

        let first = parse("Section", &text, "parent").unwrap();
        let second = parse("Section", &text, "parent").unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.destination, format!("{dir}/{file}.md"));
        prop_assert_eq!(first.icon, icon);
        prop_assert_eq!(first.hide, hide);
    }

    /// 保存先は常に空でない相対パス
    #[test]
    fn prop_default_destination_is_relative(
        url in url_strategy(),
        name in segment_strategy(),
        parents in proptest::collection::vec(segment_strategy(), 0..3),
    ) {
        let parent = parents.join("/");
        let req = parse(&name, &format!("!import {url}"), &parent).unwrap();

        prop_assert!(!req.destination.is_empty());
        prop_assert!(!req.destination.starts_with('/'));
        let expected_suffix = format!("{}.md", name);
        prop_assert!(req.destination.ends_with(&expected_suffix));
    }
}
