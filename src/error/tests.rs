use crate::error::Failure;
use indoc::indoc;
use test_case::test_case;

#[test_case(
    Failure::at(0),
    indoc! {
        r#"
        unexpected input at offset 0
        "#
    }
)]
#[test_case(
    Failure::new(3, ["x"]),
    indoc! {
        r#"
        expected "x" at offset 3
        "#
    }
)]
#[test_case(
    Failure::new(1, ["x", "end of input"]),
    indoc! {
        r#"
        expected either "x" or "end of input" at offset 1
        "#
    }
)]
#[test_case(
    Failure::new(7, ["x", "y", "z"]).into_fatal(),
    indoc! {
        r#"
        expected one of "x", "y", or "z" at offset 7
        "#
    }
)]
fn failure_display(f: Failure, expected: &str) {
    let actual = f.to_string();
    let expected = expected.trim_end();
    assert_eq!(
        expected, &actual,
        "\n= Expected =\n{}\n= Actual =\n{}",
        expected, &actual,
    );
}

#[test]
fn prioritize_prefers_furthest() {
    let near = Failure::new(1, ["a"]);
    let far = Failure::new(4, ["b"]);

    assert_eq!(near.clone().prioritize(far.clone(), true), far);
    assert_eq!(far.clone().prioritize(near, true), far);
}

#[test]
fn prioritize_merges_ties_in_order() {
    let a = Failure::new(2, ["a"]);
    let b = Failure::new(2, ["b", "c"]);

    assert_eq!(a.clone().prioritize(b.clone(), true), Failure::new(2, ["a", "b", "c"]));
    assert_eq!(a.clone().prioritize(b, false), a);
}

#[test]
fn into_fatal_keeps_location() {
    let f = Failure::new(5, ["x"]).into_fatal();
    assert!(f.is_fatal());
    assert_eq!(f.offset, 5);
    assert_eq!(f.expected, vec!["x"]);
}
