//! Table catalog for the course database.
//!
//! The fixture is written table by table in [`Table::ALL`] order; every
//! table only references tables that appear before it.

use std::fmt;

/// A table of the course database that receives fixture rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Users,
    Courses,
    UserCourse,
    Sheets,
    SheetCourse,
    Tasks,
    TaskSheet,
    Submissions,
    Grades,
    Groups,
    UserGroup,
    TaskRatings,
    GroupBids,
    Materials,
    MaterialCourse,
    Exams,
    UserExam,
}

impl Table {
    /// Output order of the fixture file
    pub const ALL: [Table; 17] = [
        Table::Users,
        Table::Courses,
        Table::UserCourse,
        Table::Sheets,
        Table::SheetCourse,
        Table::Tasks,
        Table::TaskSheet,
        Table::Submissions,
        Table::Grades,
        Table::Groups,
        Table::UserGroup,
        Table::TaskRatings,
        Table::GroupBids,
        Table::Materials,
        Table::MaterialCourse,
        Table::Exams,
        Table::UserExam,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Courses => "courses",
            Table::UserCourse => "user_course",
            Table::Sheets => "sheets",
            Table::SheetCourse => "sheet_course",
            Table::Tasks => "tasks",
            Table::TaskSheet => "task_sheet",
            Table::Submissions => "submissions",
            Table::Grades => "grades",
            Table::Groups => "groups",
            Table::UserGroup => "user_group",
            Table::TaskRatings => "task_ratings",
            Table::GroupBids => "group_bids",
            Table::Materials => "materials",
            Table::MaterialCourse => "material_course",
            Table::Exams => "exams",
            Table::UserExam => "user_exam",
        }
    }

    /// Name of the identity sequence backing the `id` column
    pub fn sequence_name(&self) -> String {
        format!("{}_id_seq", self.name())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_names() {
        assert_eq!(Table::UserCourse.sequence_name(), "user_course_id_seq");
        assert_eq!(Table::TaskRatings.sequence_name(), "task_ratings_id_seq");
        assert_eq!(Table::ALL.len(), 17);
        assert_eq!(Table::ALL[0].to_string(), "users");
    }
}
