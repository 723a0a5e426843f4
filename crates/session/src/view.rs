//! Fixed-width table rendering for every exercise.

use std::io::{self, Write};

use db::models::{Employee, Product, Student};

pub const PRODUCT_RULE_WIDTH: usize = 53;
pub const EMPLOYEE_RULE_WIDTH: usize = 60;
pub const STUDENT_RULE_WIDTH: usize = 72;

/// Product listing. An empty slice prints a "no products" line instead of a
/// header-only table.
pub fn product_table(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    writeln!(
        out,
        "{:<10} {:<25} {:<10} {:<10}",
        "ProductID", "ProductName", "Price", "Quantity"
    )?;
    writeln!(out, "{}", "-".repeat(PRODUCT_RULE_WIDTH))?;
    for p in products {
        writeln!(
            out,
            "{:<10} {:<25} {:<10.2} {:<10}",
            p.id, p.name, p.price, p.quantity
        )?;
    }
    Ok(())
}

/// Employee report body, framed by rules and closed by the record count.
pub fn employee_table(out: &mut impl Write, employees: &[Employee]) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(EMPLOYEE_RULE_WIDTH))?;
    writeln!(out, "EMPLOYEE RECORDS FROM DATABASE")?;
    writeln!(out, "{}", "=".repeat(EMPLOYEE_RULE_WIDTH))?;
    writeln!(out, "{:<10} {:<25} {:<15}", "EmpID", "Name", "Salary")?;
    writeln!(out, "{}", "-".repeat(EMPLOYEE_RULE_WIDTH))?;
    for e in employees {
        writeln!(out, "{:<10} {:<25} {:<15.2}", e.id, e.name, e.salary)?;
    }
    writeln!(out, "{}", "-".repeat(EMPLOYEE_RULE_WIDTH))?;
    writeln!(out, "Total Records Fetched: {}", employees.len())?;
    writeln!(out, "{}", "=".repeat(EMPLOYEE_RULE_WIDTH))
}

pub fn student_table(out: &mut impl Write, students: &[Student]) -> io::Result<()> {
    if students.is_empty() {
        return writeln!(out, "No students found in the database.");
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:<12} {:<25} {:<20} {:<10}",
        "Student ID", "Name", "Department", "Marks"
    )?;
    writeln!(out, "{}", "-".repeat(STUDENT_RULE_WIDTH))?;
    for s in students {
        writeln!(
            out,
            "{:<12} {:<25} {:<20} {:<10.2}",
            s.id, s.name, s.department, s.marks
        )?;
    }
    writeln!(out, "{}", "-".repeat(STUDENT_RULE_WIDTH))?;
    writeln!(out, "Total Students: {}", students.len())
}

pub fn student_card(out: &mut impl Write, student: &Student) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Student Details:")?;
    writeln!(out, "----------------------------")?;
    writeln!(out, "Student ID  : {}", student.id)?;
    writeln!(out, "Name        : {}", student.name)?;
    writeln!(out, "Department  : {}", student.department)?;
    writeln!(out, "Marks       : {:?}", student.marks)?;
    writeln!(out, "----------------------------")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_product_list_has_no_header() {
        let out = render(|b| product_table(b, &[]));
        assert_eq!(out, "No products found.\n");
    }

    #[test]
    fn product_rows_are_fixed_width() {
        let out = render(|b| {
            product_table(
                b,
                &[Product { id: 1, name: "Widget".into(), price: 10.0, quantity: 3 }],
            )
        });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ProductID  ProductName               Price      Quantity  ");
        assert_eq!(lines[1].len(), PRODUCT_RULE_WIDTH);
        assert_eq!(lines[2], "1          Widget                    10.00      3         ");
    }

    #[test]
    fn employee_report_counts_records() {
        let out = render(|b| {
            employee_table(
                b,
                &[Employee { id: 7, name: "Al".into(), salary: 1234.5 }],
            )
        });
        assert!(out.contains("7          Al                        1234.50"));
        assert!(out.contains("Total Records Fetched: 1"));
    }

    #[test]
    fn empty_student_list_prints_message() {
        let out = render(|b| student_table(b, &[]));
        assert_eq!(out, "No students found in the database.\n");
    }

    #[test]
    fn student_card_keeps_a_fractional_digit_on_whole_marks() {
        let student = Student {
            id: 10,
            name: "Ada".into(),
            department: "CSE".into(),
            marks: 95.0,
        };
        let out = render(|b| student_card(b, &student));
        assert!(out.contains("Marks       : 95.0\n"));
        assert_eq!(
            student.to_string(),
            "Student{StudentID=10, Name='Ada', Department='CSE', Marks=95.0}"
        );
    }
}
