// End-to-end: slow log -> EXPLAIN batch -> (canned mysql output) -> formatted plan
use setsumei::{ExplainBuilder, ExplainConfig, SetsumeiError, TableFormatter};

const SLOW_LOG: &str = "\
Reading mysql slow query log from /var/log/mysql/mysql-slow.log
Count: 1520  Time=0.09s (136s)  Lock=0.00s (0s)  Rows=25.0 (38000), isucon[isucon]@localhost
  SELECT * FROM estate WHERE door_height >= N AND door_height < N ORDER BY popularity DESC, id ASC LIMIT N OFFSET N
";

const LOG: &str = "\
Count: 1520  Time=0.09s (136s)  Lock=0.00s (0s)  Rows=25.0 (38000), isucon[isucon]@localhost
  SELECT * FROM estate WHERE door_height >= N AND door_height < N ORDER BY popularity DESC, id ASC LIMIT N OFFSET N

Count: 310  Time=0.01s (3s)  Lock=0.00s (0s)  Rows=1.0 (310), isucon[isucon]@localhost
  SELECT * FROM chair WHERE id = N

Count: 12  Time=0.30s (3s)  Lock=0.00s (0s)  Rows=3.0 (36), isucon[isucon]@localhost
  SELECT * FROM chair WHERE name LIKE 'S'
  ORDER BY popularity DESC LIMIT N
";

const MYSQL_OUTPUT: &str = "\
id\tselect_type\ttable\tpartitions\ttype\tpossible_keys\tkey\tkey_len\tref\trows\tfiltered\tExtra
1\tSIMPLE\testate\tNULL\trange\tidx_door_height\tidx_door_height\t8\tNULL\t3100\t100.00\tUsing index condition; Using filesort
id\tselect_type\ttable\tpartitions\ttype\tpossible_keys\tkey\tkey_len\tref\trows\tfiltered\tExtra
1\tSIMPLE\tchair\tNULL\tconst\tPRIMARY\tPRIMARY\t4\tconst\t1\t100.00\tNULL
id\tselect_type\ttable\tpartitions\ttype\tpossible_keys\tkey\tkey_len\tref\trows\tfiltered\tExtra
1\tSIMPLE\tchair\tNULL\tALL\tNULL\tNULL\tNULL\tNULL\t29000\t11.11\tUsing where; Using filesort
";

#[test]
fn test_build_explain_batch() {
    let mut config = ExplainConfig::new();
    config.number = 100;
    config.limit = Some(25);
    config.offset = Some(0);
    config.like = Some("%sofa%".to_string());

    let batch = ExplainBuilder::new(&config).build(LOG).unwrap();
    assert_eq!(
        batch.statements(),
        [
            "EXPLAIN SELECT * FROM estate WHERE door_height >= 100 AND door_height < 600 ORDER BY popularity DESC, id ASC LIMIT 25 OFFSET 0;",
            "EXPLAIN SELECT * FROM chair WHERE id = 100;",
            "EXPLAIN SELECT * FROM chair WHERE name LIKE '%sofa%' ORDER BY popularity DESC LIMIT 25;",
        ]
    );
}

#[test]
fn test_special_override_beats_context() {
    let mut config = ExplainConfig::new();
    config.add_special("2,1,3".parse().unwrap());

    let batch = ExplainBuilder::new(&config).build(LOG).unwrap();
    assert!(batch.statements()[2].ends_with("LIMIT 3;"));
    assert!(batch.statements()[0].ends_with("LIMIT 1 OFFSET 1;"));
}

#[test]
fn test_mysqldumpslow_banner_is_rejected() {
    let config = ExplainConfig::new();
    let err = ExplainBuilder::new(&config).build(SLOW_LOG).unwrap_err();
    assert!(matches!(err, SetsumeiError::InvalidHeader(_)));
}

#[test]
fn test_empty_input() {
    let config = ExplainConfig::new();
    let err = ExplainBuilder::new(&config).build("\n\n").unwrap_err();
    assert!(matches!(err, SetsumeiError::EmptyLog));
}

#[test]
fn test_format_plain() {
    let config = ExplainConfig::new();
    let out = TableFormatter::new(&config, false).format(MYSQL_OUTPUT);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("    id select_type"));
    assert!(lines[1].starts_with("[0] 1  SIMPLE      estate"));
    assert!(lines[2].starts_with("[1] 1  SIMPLE      chair"));
    assert!(lines[3].starts_with("[2] 1  SIMPLE      chair"));
    assert!(!out.contains('\x1b'));
    assert!(lines.iter().all(|l| !l.ends_with(' ')));
}

#[test]
fn test_format_compact_colored() {
    let mut config = ExplainConfig::new();
    config.compact = true;
    let out = TableFormatter::new(&config, true).format(MYSQL_OUTPUT);
    let lines: Vec<&str> = out.lines().collect();

    assert!(lines[0].starts_with("#: id, sel.: select_type"));
    assert_eq!(lines[1], "");
    assert!(lines[2].starts_with("    # "));

    // filesort flagged on both rows that use it
    assert_eq!(out.matches("\x1b[1;31mfilesort\x1b[0m").count(), 2);
    // chosen index highlighted in possible_keys
    assert!(lines[3].contains("range \x1b[36midx_door_height\x1b[0m idx_door_height"));
    assert!(lines[4].contains("const \x1b[36mPRIMARY\x1b[0m"));

    for line in &lines[2..] {
        assert!(!line.contains("NULL"));
        assert!(!line.contains("Using "));
        assert!(!line.contains(".00"));
    }
}

#[test]
fn test_custom_ban_pattern() {
    let mut config = ExplainConfig::new();
    config.ban = regex::Regex::new(r"\bALL\b").unwrap();
    let out = TableFormatter::new(&config, true).format(MYSQL_OUTPUT);

    assert!(out.contains("\x1b[1;31mALL\x1b[0m"));
    assert!(!out.contains("\x1b[1;31mfilesort"));
}
