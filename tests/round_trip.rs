mod common;

use common::grade_table;
use gradefill::gradebook::export_filename;
use gradefill::steps;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;

#[test]
fn export_then_reload_keeps_students_and_grades() {
    let dir = tempfile::tempdir().unwrap();
    let book = steps::build_gradebook(&grade_table(4, 3)).unwrap();

    let file_name = export_filename("9º ANO B - 03/02/2025 a 28/11/2025");
    assert_eq!(file_name, "9_ANO_B_Notas_Para_Edicao.xlsx");

    let path = steps::export_gradebook(&book, dir.path(), &file_name).unwrap();
    let edited = steps::load_edited(&path).unwrap();

    assert_eq!(edited.student_count(), 4);
    assert!(edited.column_count() <= 4);
    assert_eq!(edited.headers[0], "Aluno");
    for (i, student) in book.rows.iter().enumerate() {
        assert_eq!(edited.student_name(i), Some(student.name.as_str()));
        assert_eq!(edited.grade(i, 2), Some(Some(format!("{},3", i + 1).as_str())));
    }
    edited.align(&book).unwrap();
}

#[test]
fn exporting_twice_keeps_the_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let book = steps::build_gradebook(&grade_table(1, 1)).unwrap();

    steps::export_gradebook(&book, dir.path(), "Turma_Notas_Para_Edicao.xlsx").unwrap();
    steps::export_gradebook(&book, dir.path(), "Turma_Notas_Para_Edicao.xlsx").unwrap();

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 2);
}

#[test]
fn numbers_typed_by_the_operator_reload_with_comma_decimals() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited.xlsx");

    // A spreadsheet program stores typed numbers as floats.
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Aluno").unwrap();
    sheet.write_string(0, 1, "VERIFICACAO PARCIAL").unwrap();
    sheet.write_string(0, 2, "VERIFICACAO GLOBAL").unwrap();
    sheet.write_string(0, 3, "ATIVIDADE 1").unwrap();
    sheet.write_string(1, 0, "Ana").unwrap();
    sheet.write_number(1, 1, 7.5).unwrap();
    sheet.write_number(1, 2, 10.0).unwrap();
    sheet.write_string(1, 3, "nan").unwrap();
    sheet.write_string(2, 0, "Bruno").unwrap();
    sheet.write_string(2, 1, "N/C").unwrap();
    workbook.save(&path).unwrap();

    let edited = steps::load_edited(&path).unwrap();

    assert_eq!(edited.grade(0, 0), Some(Some("7,5")));
    assert_eq!(edited.grade(0, 1), Some(Some("10")));
    assert_eq!(edited.grade(0, 2), Some(None));
    assert_eq!(edited.grade(1, 0), Some(Some("N/C")));
    assert_eq!(edited.grade(1, 1), Some(None));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = steps::load_edited(&dir.path().join("gone.xlsx")).unwrap_err();
    assert!(err.to_string().contains("File not found"));
}
