use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::election::*;

/// Reads all the rows of a worksheet as text, header included.
///
/// The worksheet is the named one, or the only one of the workbook.
pub fn read_xlsx_rows(
    path: &str,
    worksheet_name: &Option<String>,
) -> BElectionResult<Vec<Vec<String>>> {
    let wrange = get_range(path, worksheet_name)?;
    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = idx + 1;
        let cells: Vec<String> = row
            .iter()
            .map(|c| cell_text(c, lineno))
            .collect::<ElectionResult<Vec<String>>>()?;
        debug!("read_xlsx_rows: lineno: {:?} row: {:?}", lineno, &cells);
        res.push(cells);
    }
    Ok(res)
}

fn cell_text(cell: &DataType, lineno: usize) -> ElectionResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Empty => Ok(String::new()),
        // Form timestamps are not read, keep their serial value.
        DataType::DateTime(f) => Ok(f.to_string()),
        x => Err(ElectionError::ExcelWrongCellType {
            lineno: lineno as u64,
            content: format!("{:?}", x),
        }),
    }
}

fn get_range(path: &str, worksheet_name: &Option<String>) -> BElectionResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_file: path: {:?} worksheet: {:?}",
        &path, &worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => Err(Box::new(ElectionError::EmptyExcel {})),
            [(name, wrange)] => {
                debug!("read_excel_file: using the only worksheet {:?}", name);
                Ok(wrange.clone())
            }
            _ => Err(Box::new(ElectionError::AmbiguousWorksheet {
                names: all_worksheets.iter().map(|(n, _)| n.clone()).collect(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_as_text() {
        assert_eq!(cell_text(&DataType::Float(2.0), 1).unwrap(), "2");
        assert_eq!(cell_text(&DataType::Float(2.5), 1).unwrap(), "2.5");
        assert_eq!(cell_text(&DataType::Int(3), 1).unwrap(), "3");
        assert_eq!(cell_text(&DataType::Empty, 1).unwrap(), "");
        assert_eq!(
            cell_text(&DataType::String("Alice".to_string()), 1).unwrap(),
            "Alice"
        );
    }

    #[test]
    fn missing_workbook() {
        let res = read_xlsx_rows("/nonexistent/responses.xlsx", &None);
        assert!(matches!(
            res.map_err(|e| *e),
            Err(ElectionError::OpeningExcel { .. })
        ));
    }
}
