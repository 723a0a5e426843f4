//! Row structs that map 1-to-1 onto database tables.
//!
//! Column names follow the exercise schema (`ProductID`, `EmpID`, …); the
//! repository queries alias them to the field names below. Decimal columns
//! are read back as `f64` and always displayed with two fractional digits.

use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A product row. The identifier is chosen by the caller, never generated.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

// ---------------------------------------------------------------------------
// Employee
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub salary: f64,
}

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub marks: f64,
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Student{{StudentID={}, Name='{}', Department='{}', Marks={:?}}}",
            self.id, self.name, self.department, self.marks
        )
    }
}
