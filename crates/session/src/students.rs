//! Student management menu.
//!
//! Split the classic way: [`db::models::Student`] is the model, the
//! `db::repository::students` functions are the controller, and the view is
//! [`crate::view`] plus the prompts below. Every operation autocommits; a
//! store error is reported and the menu carries on.

use std::io::{BufRead, Write};

use db::models::Student;
use db::repository::students as student_repo;
use db::{DbError, DbPool};
use tracing::{instrument, warn};

use crate::console::Console;
use crate::error::{InputError, SessionError};
use crate::view;

pub struct StudentMenu<R, W> {
    pool: DbPool,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> StudentMenu<R, W> {
    pub fn new(pool: DbPool, console: Console<R, W>) -> Self {
        Self { pool, console }
    }

    pub fn into_parts(self) -> (DbPool, Console<R, W>) {
        (self.pool, self.console)
    }

    /// Run the menu until "Exit" is chosen or the input ends.
    #[instrument(skip_all)]
    pub async fn run(&mut self) -> Result<(), SessionError> {
        loop {
            self.show_menu()?;
            let choice = match self.console.read_int("Enter your choice: ") {
                Ok(n) => n,
                Err(InputError::Closed) => return Ok(()),
                Err(e) => return Err(e.into()),
            };

            let handled = match choice {
                1 => self.add().await,
                2 => self.view_all().await,
                3 => self.view_one().await,
                4 => self.update().await,
                5 => self.delete().await,
                6 => {
                    self.console.say("\nExiting Student Management System...")?;
                    self.console.say("Thank you for using the application!")?;
                    return Ok(());
                }
                _ => {
                    self.console.say("\nInvalid choice! Please try again.")?;
                    Ok(())
                }
            };

            match handled {
                Ok(()) => {}
                Err(e) if e.is_input_closed() => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    async fn add(&mut self) -> Result<(), SessionError> {
        self.console.say("\n--- Add New Student ---")?;
        let id = self.console.read_int("Enter Student ID: ")?;
        let student = self.read_details(id)?;

        match student_repo::add_student(&self.pool, &student).await {
            Ok(true) => self.console.say("\n✓ Student added successfully!")?,
            Ok(false) => self.console.say(
                "\n✗ Failed to add student. Please check if Student ID already exists.",
            )?,
            Err(e) => {
                self.report("adding", &e)?;
                self.console.say(
                    "\n✗ Failed to add student. Please check if Student ID already exists.",
                )?;
            }
        }
        Ok(())
    }

    async fn view_all(&mut self) -> Result<(), SessionError> {
        self.console.say("\n--- All Students ---")?;
        match student_repo::list_students(&self.pool).await {
            Ok(students) => view::student_table(self.console.out(), &students)?,
            Err(e) => self.report("retrieving", &e)?,
        }
        Ok(())
    }

    async fn view_one(&mut self) -> Result<(), SessionError> {
        self.console.say("\n--- View Student by ID ---")?;
        let id = self.console.read_int("Enter Student ID: ")?;

        if let Some(student) = self.lookup(id).await? {
            view::student_card(self.console.out(), &student)?;
        }
        Ok(())
    }

    async fn update(&mut self) -> Result<(), SessionError> {
        self.console.say("\n--- Update Student ---")?;
        let id = self.console.read_int("Enter Student ID to update: ")?;

        let Some(current) = self.lookup(id).await? else {
            return Ok(());
        };
        self.console.say(format!("\nCurrent Details: {current}"))?;
        self.console.say("\nEnter new details:")?;
        let student = self.read_details(id)?;

        match student_repo::update_student(&self.pool, &student).await {
            Ok(true) => self.console.say("\n✓ Student updated successfully!")?,
            Ok(false) => self.console.say("\n✗ Failed to update student.")?,
            Err(e) => {
                self.report("updating", &e)?;
                self.console.say("\n✗ Failed to update student.")?;
            }
        }
        Ok(())
    }

    async fn delete(&mut self) -> Result<(), SessionError> {
        self.console.say("\n--- Delete Student ---")?;
        let id = self.console.read_int("Enter Student ID to delete: ")?;

        let Some(student) = self.lookup(id).await? else {
            return Ok(());
        };
        self.console.say(format!("\nStudent Details: {student}"))?;
        let answer = self
            .console
            .read_line("Are you sure you want to delete this student? (yes/no): ")?;

        if !answer.trim().eq_ignore_ascii_case("yes") {
            self.console.say("\nDeletion cancelled.")?;
            return Ok(());
        }

        match student_repo::delete_student(&self.pool, id).await {
            Ok(()) => self.console.say("\n✓ Student deleted successfully!")?,
            Err(DbError::NotFound) => self.console.say("\n✗ Failed to delete student.")?,
            Err(e) => {
                self.report("deleting", &e)?;
                self.console.say("\n✗ Failed to delete student.")?;
            }
        }
        Ok(())
    }

    /// Fetch a student, printing the "not found" line (or the store error)
    /// when there is nothing to show.
    async fn lookup(&mut self, id: i32) -> Result<Option<Student>, SessionError> {
        match student_repo::get_student(&self.pool, id).await {
            Ok(student) => Ok(Some(student)),
            Err(DbError::NotFound) => {
                self.console
                    .say(format!("\n✗ Student not found with ID: {id}"))?;
                Ok(None)
            }
            Err(e) => {
                self.report("retrieving", &e)?;
                Ok(None)
            }
        }
    }

    fn read_details(&mut self, id: i32) -> Result<Student, InputError> {
        let name = self.console.read_line("Enter Name: ")?;
        let department = self.console.read_line("Enter Department: ")?;
        let marks = self.console.read_decimal("Enter Marks: ")?;
        Ok(Student { id, name, department, marks })
    }

    fn report(&mut self, verb: &str, err: &DbError) -> Result<(), SessionError> {
        warn!("student operation failed ({:?}): {err}", err.kind());
        self.console.say(format!("Error {verb} student: {err}"))?;
        Ok(())
    }

    fn show_menu(&mut self) -> Result<(), SessionError> {
        let c = &mut self.console;
        c.say("\n========================================")?;
        c.say("  STUDENT MANAGEMENT SYSTEM")?;
        c.say("========================================")?;
        c.say("1. Add Student")?;
        c.say("2. View All Students")?;
        c.say("3. View Student by ID")?;
        c.say("4. Update Student")?;
        c.say("5. Delete Student")?;
        c.say("6. Exit")?;
        c.say("========================================")?;
        Ok(())
    }
}
