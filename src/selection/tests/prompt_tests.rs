use super::deals;
use crate::selection::SelectionAction;
use crate::selection::prompt::{parse_command, run};
use std::io::Cursor;

#[test]
fn test_parse_commands() {
    assert_eq!(
        parse_command("/ Sale ").unwrap(),
        vec![SelectionAction::Filter("Sale".into())]
    );
    assert_eq!(parse_command("/").unwrap(), vec![SelectionAction::Filter(String::new())]);
    assert_eq!(parse_command("A").unwrap(), vec![SelectionAction::CheckVisible]);
    assert_eq!(parse_command("n").unwrap(), vec![SelectionAction::Clear]);
    assert_eq!(parse_command("c").unwrap(), vec![SelectionAction::Confirm]);
    assert_eq!(parse_command("q").unwrap(), vec![SelectionAction::Cancel]);
    assert!(parse_command("   ").unwrap().is_empty());
}

#[test]
fn test_parse_numbers_and_ranges() {
    assert_eq!(
        parse_command("3, 1 5-6").unwrap(),
        vec![
            SelectionAction::Toggle(2),
            SelectionAction::Toggle(0),
            SelectionAction::Toggle(4),
            SelectionAction::Toggle(5),
        ]
    );
    assert!(parse_command("0").is_err());
    assert!(parse_command("4-2").is_err());
    assert!(parse_command("bogus").is_err());
}

#[test]
fn test_run_confirms_in_scan_order() {
    let deals = deals(&["Summer Sale", "Winter Coats", "Garage Sale", "Flash Deal"]);
    let input = Cursor::new("4\n/sale\n3 1\nc\n");
    let mut output = Vec::new();

    let chosen = run(&deals, input, &mut output).unwrap().unwrap();

    let titles: Vec<_> = chosen.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(titles, vec!["Summer Sale", "Garage Sale", "Flash Deal"]);

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("filter \"sale\": 2 of 4 shown, 1 checked"));
    assert!(printed.contains("[x]   3. p2"));
}

#[test]
fn test_numbers_of_hidden_rows_are_ignored() {
    let deals = deals(&["Summer Sale", "Winter Coats", "Garage Sale"]);
    let input = Cursor::new("/sale\n1-3\n/\nc\n");
    let mut output = Vec::new();

    let chosen = run(&deals, input, &mut output).unwrap().unwrap();

    let titles: Vec<_> = chosen.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(titles, vec!["Summer Sale", "Garage Sale"]);
}

#[test]
fn test_run_cancel_and_eof_yield_nothing() {
    let deals = deals(&["A", "B"]);

    let mut output = Vec::new();
    assert!(run(&deals, Cursor::new("1\nq\n"), &mut output).unwrap().is_none());

    let mut output = Vec::new();
    assert!(run(&deals, Cursor::new("1 2\n"), &mut output).unwrap().is_none());
}

#[test]
fn test_run_reports_bad_input_and_continues() {
    let deals = deals(&["A", "B"]);
    let mut output = Vec::new();

    let chosen = run(&deals, Cursor::new("what\n2\nc\n"), &mut output).unwrap().unwrap();

    assert_eq!(chosen.len(), 1);
    assert_eq!(chosen[0].text, "B");
    assert!(String::from_utf8(output).unwrap().contains("Unknown command 'what'"));
}
