use super::*;

#[test]
fn test_basic_write() {
    let mut writer = SourceWriter::new();
    writer.write("hello");
    writer.write(" ");
    writer.write("world");
    assert_eq!(writer.get_output(), "hello world");
}

#[test]
fn test_newline_tracking() {
    let mut writer = SourceWriter::new();
    writer.write("line 1");
    writer.write_line();
    writer.write("line 2");

    assert_eq!(writer.current_line(), 1);
    assert_eq!(writer.get_output(), "line 1\nline 2");
}

#[test]
fn test_indentation() {
    let mut writer = SourceWriter::new();
    writer.write("start");
    writer.write_line();
    writer.increase_indent();
    writer.write("indented");
    writer.write_line();
    writer.decrease_indent();
    writer.write("back");

    assert_eq!(writer.get_output(), "start\n  indented\nback");
}

#[test]
fn test_column_tracking() {
    let mut writer = SourceWriter::new();
    writer.write("abc");
    assert_eq!(writer.current_column(), 3);
    writer.write_line();
    assert_eq!(writer.current_column(), 0);
    writer.increase_indent();
    // Pending indentation counts toward the next write's column.
    assert_eq!(writer.current_column(), 2);
    writer.write("x");
    assert_eq!(writer.current_column(), 3);
}

#[test]
fn test_no_trailing_indent_on_empty_lines() {
    let mut writer = SourceWriter::new();
    writer.increase_indent();
    writer.write_line();
    writer.decrease_indent();
    writer.write("x");
    assert_eq!(writer.get_output(), "\nx");
}
