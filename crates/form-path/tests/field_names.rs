use form_path::{parse, MalformedPath, Path, Segment};

#[test]
fn test_checkbox_group_name() {
    let path = parse("preferences.topics").unwrap();
    assert_eq!(path.segments(), &[Segment::key("preferences"), Segment::key("topics")]);
}

#[test]
fn test_top_level_list_form() {
    let path = parse("[3].title").unwrap();
    assert_eq!(path.to_string(), "[3].title");
}

#[test]
fn test_from_str() {
    let path: Path = "tasks[0].name".parse().unwrap();
    assert_eq!(path.len(), 3);
    let err = "tasks[".parse::<Path>().unwrap_err();
    assert_eq!(err, MalformedPath::UnclosedBracket);
}

#[test]
fn test_error_messages() {
    assert_eq!(MalformedPath::EmptySegment.to_string(), "empty path segment");
    assert_eq!(MalformedPath::InvalidIndex("x".into()).to_string(), "invalid list index: \"x\"");
}

#[test]
fn test_name_length_limit() {
    let name = "x".repeat(form_path::MAX_NAME_LENGTH + 1);
    assert_eq!(parse(&name), Err(MalformedPath::TooLong));
}

#[test]
fn test_depth_limit() {
    let name = format!("a{}", "[0]".repeat(form_path::MAX_PATH_DEPTH));
    assert_eq!(parse(&name), Err(MalformedPath::TooDeep));
}
