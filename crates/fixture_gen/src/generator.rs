//! Data generator that produces row data for all tables.
//!
//! Generates deterministic, FK-consistent course data. Rows are built in
//! dependency order (users, courses, enrollments, sheets and tasks,
//! submissions and grades, groups, ratings, bids, materials, group
//! memberships, exams) from a single seeded RNG; changing the order of any
//! draw changes every value generated after it.

use crate::config::FixtureConfig;
use crate::fake::{FakeData, TEXT_MAX_CHARS};
use crate::schema::Table;
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// SQL value representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i64),
    Str(String),
    Bool(bool),
    Null,
    /// The column default, usually the next value of the identity sequence
    Default,
    /// `current_timestamp` at insert time
    Timestamp,
}

impl SqlValue {
    pub fn str(value: impl Into<String>) -> Self {
        SqlValue::Str(value.into())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SqlValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

/// A row of generated data as ordered (column, value) pairs
pub type Record = Vec<(&'static str, SqlValue)>;

/// Generated data for a single table
#[derive(Debug, Clone)]
pub struct TableData {
    pub table: Table,
    pub rows: Vec<Record>,
}

impl TableData {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Integer values of `column`, one per row that has it
    pub fn int_column(&self, column: &str) -> Vec<i64> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.iter()
                    .find(|(name, _)| *name == column)
                    .and_then(|(_, value)| value.as_int())
            })
            .collect()
    }
}

/// All generated data, in output order
#[derive(Debug, Clone)]
pub struct GeneratedData {
    pub tables: Vec<TableData>,
}

impl GeneratedData {
    pub fn table(&self, table: Table) -> Option<&TableData> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn row_count(&self, table: Table) -> usize {
        self.table(table).map(TableData::len).unwrap_or(0)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(TableData::len).sum()
    }
}

/// Account kind of a generated user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Tutor,
    Student,
}

impl UserRole {
    pub fn email_domain(&self) -> &'static str {
        match self {
            UserRole::Admin => "uni-tuebingen.de",
            UserRole::Tutor => "tutor.uni-tuebingen.de",
            UserRole::Student => "student.uni-tuebingen.de",
        }
    }

    /// Value of `user_course.role`
    pub fn course_role(&self) -> i64 {
        match self {
            UserRole::Student => 0,
            UserRole::Tutor => 1,
            UserRole::Admin => 2,
        }
    }
}

/// Output of the test runner stored with every grade
const GRADE_TEST_LOG: &str = "[   OK   ] BinaryToStringValueTest:
[   OK   ] BinaryToStringClassStructureTest:
[   OK   ] AckermanClassStructureTest:
[ FAILED ] AckermannValueTest:
        Error 1/1
          - Tag: failure
          - Typ: junit.framework.AssertionFailedError
          - Msg: ackermann(2, 2) expected:<7> but was:<9>

[   OK   ] FibonacciValueTest:
[   OK   ] FibonacciClassStructureTest:
[ FAILED ] FactorialValueTest:
        Error 1/1
          - Tag: error
          - Typ: java.lang.ClassCastException
          - Msg: java.base/java.lang.Float cannot be cast to java.base/java.lang.Integer

[ FAILED ] FactorialClassStructureTest:
        Error 1/1
          - Tag: failure
          - Typ: junit.framework.AssertionFailedError
          - Msg: Method `public static float factorial (int )` in `class Factorial` found, but expected return type (`int`) is wrong. I just found `float`
";

const DOCKER_IMAGE: &str = "ImageCIRunnerJavaEnv";
const MATERIAL_FILENAME: &str = "path2";
const GRADED_FEEDBACK: &str = "Lorem Ipsum Feedback";
const EXAM_MARK: &str = "mark";

fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .unwrap_or_default()
}

/// Format as `2019-02-01T01:02:03.000000Z`
pub fn time_stamp(time: NaiveDateTime) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// ID of the course at 1-based `position` of the config's course list
fn course_at(course_ids: &[i64], position: usize) -> anyhow::Result<i64> {
    position
        .checked_sub(1)
        .and_then(|i| course_ids.get(i))
        .copied()
        .with_context(|| format!("No course at position {}", position))
}

/// ID tracking for FK relationships
#[derive(Debug, Default)]
struct IdTracker {
    /// Table -> next ID to assign
    next_id: HashMap<Table, i64>,
}

impl IdTracker {
    fn next_id(&mut self, table: Table) -> i64 {
        let id = self.next_id.entry(table).or_insert(1);
        let current = *id;
        *id += 1;
        current
    }
}

/// User IDs by role, each a contiguous range
#[derive(Debug, Default)]
struct Roster {
    admins: Vec<i64>,
    tutors: Vec<i64>,
    students: Vec<i64>,
}

impl Roster {
    fn by_role(&self) -> [(UserRole, &[i64]); 3] {
        [
            (UserRole::Admin, self.admins.as_slice()),
            (UserRole::Tutor, self.tutors.as_slice()),
            (UserRole::Student, self.students.as_slice()),
        ]
    }
}

/// A task together with the points it is worth
#[derive(Debug, Clone, Copy)]
struct TaskRef {
    id: i64,
    max_points: i64,
}

/// Main data generator
pub struct Generator {
    config: FixtureConfig,
    fake: FakeData<ChaCha8Rng>,
    begins_at: NaiveDateTime,
    ends_at: NaiveDateTime,
}

impl Generator {
    pub fn new(config: FixtureConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            fake: FakeData::new(rng),
            begins_at: datetime(2019, 2, 1, 1, 2, 3),
            ends_at: datetime(2019, 7, 30, 23, 59, 59),
        }
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Generate all tables.
    ///
    /// The RNG is consumed, so a second call on the same generator yields
    /// different values; build a new generator to reproduce a fixture.
    pub fn generate(&mut self) -> anyhow::Result<GeneratedData> {
        self.config.validate()?;

        let mut ids = IdTracker::default();
        let password_hash = self.password_hash()?;

        let (users, roster) = self.generate_users(&mut ids, &password_hash);
        let (courses, course_ids) = self.generate_courses(&mut ids);
        let main_course = course_at(&course_ids, 1)?;
        let group_course = course_at(&course_ids, self.config.group_course)?;
        let material_course = course_at(&course_ids, self.config.material_course)?;
        let user_course = self.generate_user_course(&mut ids, &roster, &course_ids);

        let (sheets, sheet_course, tasks, task_sheet, task_refs) =
            self.generate_sheets(&mut ids, main_course);

        let (submissions, grades) =
            self.generate_submissions(&mut ids, &roster.students, &roster.tutors, &task_refs);

        let (groups, group_ids) = self.generate_groups(&mut ids, &roster.tutors, group_course);
        let task_ratings = self.generate_task_ratings(&mut ids, &roster.students, &task_refs);
        let group_bids = self.generate_group_bids(&mut ids, &roster.students, &group_ids);
        let (materials, material_course) = self.generate_materials(&mut ids, material_course);
        let user_group = self.generate_user_group(&mut ids, &roster.students, &group_ids);

        let mut tables = vec![
            users,
            courses,
            user_course,
            sheets,
            sheet_course,
            tasks,
            task_sheet,
            submissions,
            grades,
            groups,
            user_group,
            task_ratings,
            group_bids,
            materials,
            material_course,
        ];

        if !self.config.exams.is_empty() {
            let (exams, exam_ids) = self.generate_exams(&mut ids, main_course);
            tables.push(exams);
            tables.push(self.generate_user_exam(&mut ids, &roster.students, &exam_ids));
        }

        Ok(GeneratedData { tables })
    }

    /// bcrypt hash of the shared password, salted from the seeded RNG
    fn password_hash(&mut self) -> anyhow::Result<String> {
        let salt = self.fake.salt();
        let parts = bcrypt::hash_with_salt(&self.config.password, self.config.password_cost, salt)
            .context("Failed to hash the fixture password")?;
        Ok(parts.format_for_version(bcrypt::Version::TwoA))
    }

    fn generate_users(&mut self, ids: &mut IdTracker, password_hash: &str) -> (TableData, Roster) {
        let counts = self.config.counts;
        let mut data = TableData::new(Table::Users);
        let mut roster = Roster::default();

        for (role, count) in [
            (UserRole::Admin, counts.admins),
            (UserRole::Tutor, counts.tutors),
            (UserRole::Student, counts.students),
        ] {
            for _ in 0..count {
                let id = ids.next_id(Table::Users);
                let login = role == UserRole::Admin && roster.admins.is_empty();
                data.rows.push(self.user_record(role, password_hash, login));
                match role {
                    UserRole::Admin => roster.admins.push(id),
                    UserRole::Tutor => roster.tutors.push(id),
                    UserRole::Student => roster.students.push(id),
                }
            }
        }

        (data, roster)
    }

    fn user_record(&mut self, role: UserRole, password_hash: &str, login: bool) -> Record {
        let first_name = self.fake.first_name();
        let last_name = self.fake.last_name();
        let student_number = self.fake.int_range(1000, 2000);
        let semester = self.fake.int_range(2, 8);
        let subject = self.fake.subject();
        let language = self.fake.language();

        let email = match &self.config.login_email {
            Some(address) if login => address.clone(),
            _ => format!("{}.{}@{}", first_name, last_name, role.email_domain()).to_lowercase(),
        };

        vec![
            ("id", SqlValue::Default),
            ("created_at", SqlValue::Timestamp),
            ("updated_at", SqlValue::Timestamp),
            ("first_name", SqlValue::str(first_name)),
            ("last_name", SqlValue::str(last_name)),
            ("email", SqlValue::Str(email)),
            ("student_number", SqlValue::Int(student_number)),
            ("semester", SqlValue::Int(semester)),
            ("subject", SqlValue::str(subject)),
            ("language", SqlValue::str(language)),
            ("encrypted_password", SqlValue::str(password_hash)),
            ("reset_password_token", SqlValue::Null),
            ("confirm_email_token", SqlValue::Null),
            ("root", SqlValue::Bool(role == UserRole::Admin)),
        ]
    }

    fn generate_courses(&mut self, ids: &mut IdTracker) -> (TableData, Vec<i64>) {
        let mut data = TableData::new(Table::Courses);
        let mut course_ids = Vec::new();
        let names = self.config.courses.clone();

        for name in names {
            course_ids.push(ids.next_id(Table::Courses));

            let description = self.fake.text(TEXT_MAX_CHARS);
            let required_percentage = self.fake.int_range(10, 100);
            let max_team_size = self.fake.int_range(1, 4);

            data.rows.push(vec![
                ("id", SqlValue::Default),
                ("created_at", SqlValue::Timestamp),
                ("updated_at", SqlValue::Timestamp),
                ("name", SqlValue::Str(name)),
                ("description", SqlValue::Str(description)),
                ("begins_at", SqlValue::Str(time_stamp(self.begins_at))),
                ("ends_at", SqlValue::Str(time_stamp(self.ends_at))),
                ("required_percentage", SqlValue::Int(required_percentage)),
                ("max_team_size", SqlValue::Int(max_team_size)),
            ]);
        }

        (data, course_ids)
    }

    fn generate_user_course(
        &mut self,
        ids: &mut IdTracker,
        roster: &Roster,
        course_ids: &[i64],
    ) -> TableData {
        let mut data = TableData::new(Table::UserCourse);

        for &course_id in course_ids {
            for (role, user_ids) in roster.by_role() {
                for &user_id in user_ids {
                    ids.next_id(Table::UserCourse);
                    data.rows.push(vec![
                        ("id", SqlValue::Default),
                        ("user_id", SqlValue::Int(user_id)),
                        ("course_id", SqlValue::Int(course_id)),
                        ("role", SqlValue::Int(role.course_role())),
                        ("team_id", SqlValue::Null),
                        ("confirmed_team", SqlValue::Bool(false)),
                    ]);
                }
            }
        }

        data
    }

    /// Sheets of the main course, each holding `tasks_per_sheet` tasks
    #[allow(clippy::type_complexity)]
    fn generate_sheets(
        &mut self,
        ids: &mut IdTracker,
        course_id: i64,
    ) -> (TableData, TableData, TableData, TableData, Vec<TaskRef>) {
        let counts = self.config.counts;
        let mut sheets = TableData::new(Table::Sheets);
        let mut sheet_course = TableData::new(Table::SheetCourse);
        let mut tasks = TableData::new(Table::Tasks);
        let mut task_sheet = TableData::new(Table::TaskSheet);
        let mut task_refs = Vec::new();

        for i in 0..counts.sheets {
            let sheet_id = ids.next_id(Table::Sheets);
            sheets.rows.push(vec![
                ("id", SqlValue::Default),
                ("created_at", SqlValue::Timestamp),
                ("updated_at", SqlValue::Timestamp),
                ("name", SqlValue::Str(format!("Blatt {}", i))),
                ("publish_at", SqlValue::Str(time_stamp(self.begins_at))),
                ("due_at", SqlValue::Str(time_stamp(self.ends_at))),
            ]);

            ids.next_id(Table::SheetCourse);
            sheet_course.rows.push(vec![
                ("id", SqlValue::Default),
                ("sheet_id", SqlValue::Int(sheet_id)),
                ("course_id", SqlValue::Int(course_id)),
            ]);

            for k in 0..counts.tasks_per_sheet {
                let task_id = ids.next_id(Table::Tasks);
                let max_points = self.fake.int_range(10, 100);
                tasks.rows.push(vec![
                    ("id", SqlValue::Default),
                    ("created_at", SqlValue::Timestamp),
                    ("updated_at", SqlValue::Timestamp),
                    ("max_points", SqlValue::Int(max_points)),
                    ("name", SqlValue::Str(format!("task {}", k))),
                    ("public_docker_image", SqlValue::str(DOCKER_IMAGE)),
                    ("private_docker_image", SqlValue::str(DOCKER_IMAGE)),
                ]);

                ids.next_id(Table::TaskSheet);
                task_sheet.rows.push(vec![
                    ("id", SqlValue::Default),
                    ("task_id", SqlValue::Int(task_id)),
                    ("sheet_id", SqlValue::Int(sheet_id)),
                ]);

                task_refs.push(TaskRef {
                    id: task_id,
                    max_points,
                });
            }
        }

        (sheets, sheet_course, tasks, task_sheet, task_refs)
    }

    /// One submission per (student, task), each graded by a random tutor
    fn generate_submissions(
        &mut self,
        ids: &mut IdTracker,
        students: &[i64],
        tutors: &[i64],
        tasks: &[TaskRef],
    ) -> (TableData, TableData) {
        let mut submissions = TableData::new(Table::Submissions);
        let mut grades = TableData::new(Table::Grades);

        for &student_id in students {
            for task in tasks {
                let submission_id = ids.next_id(Table::Submissions);
                submissions.rows.push(vec![
                    ("id", SqlValue::Default),
                    ("created_at", SqlValue::Timestamp),
                    ("updated_at", SqlValue::Timestamp),
                    ("user_id", SqlValue::Int(student_id)),
                    ("task_id", SqlValue::Int(task.id)),
                ]);

                let tutor_id = self.fake.pick_id(tutors);
                ids.next_id(Table::Grades);
                grades
                    .rows
                    .push(self.grade_record(submission_id, tutor_id, task.max_points));
            }
        }

        (submissions, grades)
    }

    fn grade_record(&mut self, submission_id: i64, tutor_id: i64, max_points: i64) -> Record {
        let graded = self.fake.int_range(0, 1) == 1;
        let public_execution_state = self.fake.int_range(0, 2);
        let private_execution_state = self.fake.int_range(0, 2);
        let acquired_points = if graded {
            self.fake.int_range(0, max_points)
        } else {
            0
        };
        let public_test_status = self.fake.int_range(0, 1);
        let private_test_status = self.fake.int_range(0, 1);
        let feedback = if graded { GRADED_FEEDBACK } else { "" };

        vec![
            ("id", SqlValue::Default),
            ("created_at", SqlValue::Timestamp),
            ("updated_at", SqlValue::Timestamp),
            ("public_execution_state", SqlValue::Int(public_execution_state)),
            ("private_execution_state", SqlValue::Int(private_execution_state)),
            ("acquired_points", SqlValue::Int(acquired_points)),
            ("public_test_log", SqlValue::str(GRADE_TEST_LOG)),
            ("private_test_log", SqlValue::str(GRADE_TEST_LOG)),
            ("public_test_status", SqlValue::Int(public_test_status)),
            ("private_test_status", SqlValue::Int(private_test_status)),
            ("feedback", SqlValue::str(feedback)),
            ("tutor_id", SqlValue::Int(tutor_id)),
            ("submission_id", SqlValue::Int(submission_id)),
        ]
    }

    /// Exercise groups of the main course, tutors assigned round-robin
    fn generate_groups(
        &mut self,
        ids: &mut IdTracker,
        tutors: &[i64],
        course_id: i64,
    ) -> (TableData, Vec<i64>) {
        let mut data = TableData::new(Table::Groups);
        let mut group_ids = Vec::new();

        for i in 0..self.config.counts.groups() {
            group_ids.push(ids.next_id(Table::Groups));
            let tutor_id = tutors[i % tutors.len()];
            let description = self.fake.text(TEXT_MAX_CHARS);

            data.rows.push(vec![
                ("id", SqlValue::Default),
                ("created_at", SqlValue::Timestamp),
                ("updated_at", SqlValue::Timestamp),
                ("tutor_id", SqlValue::Int(tutor_id)),
                ("course_id", SqlValue::Int(course_id)),
                ("description", SqlValue::Str(description)),
            ]);
        }

        (data, group_ids)
    }

    fn generate_task_ratings(
        &mut self,
        ids: &mut IdTracker,
        students: &[i64],
        tasks: &[TaskRef],
    ) -> TableData {
        let mut data = TableData::new(Table::TaskRatings);

        for &student_id in students {
            for task in tasks {
                ids.next_id(Table::TaskRatings);
                let rating = self.fake.int_range(1, 5);
                data.rows.push(vec![
                    ("id", SqlValue::Default),
                    ("user_id", SqlValue::Int(student_id)),
                    ("task_id", SqlValue::Int(task.id)),
                    ("rating", SqlValue::Int(rating)),
                ]);
            }
        }

        data
    }

    fn generate_group_bids(
        &mut self,
        ids: &mut IdTracker,
        students: &[i64],
        group_ids: &[i64],
    ) -> TableData {
        let mut data = TableData::new(Table::GroupBids);

        for &student_id in students {
            for &group_id in group_ids {
                ids.next_id(Table::GroupBids);
                let bid = self.fake.int_range(0, 10);
                data.rows.push(vec![
                    ("id", SqlValue::Default),
                    ("user_id", SqlValue::Int(student_id)),
                    ("group_id", SqlValue::Int(group_id)),
                    ("bid", SqlValue::Int(bid)),
                ]);
            }
        }

        data
    }

    fn generate_materials(&mut self, ids: &mut IdTracker, course_id: i64) -> (TableData, TableData) {
        let mut materials = TableData::new(Table::Materials);
        let mut material_course = TableData::new(Table::MaterialCourse);

        for _ in 0..self.config.counts.materials {
            let material_id = ids.next_id(Table::Materials);
            let name = self.fake.text(TEXT_MAX_CHARS);
            let kind = self.fake.int_range(0, 1);
            let required_role = self.fake.int_range(0, 2);

            materials.rows.push(vec![
                ("id", SqlValue::Default),
                ("created_at", SqlValue::Timestamp),
                ("updated_at", SqlValue::Timestamp),
                ("name", SqlValue::Str(name)),
                ("filename", SqlValue::str(MATERIAL_FILENAME)),
                ("kind", SqlValue::Int(kind)),
                ("required_role", SqlValue::Int(required_role)),
                ("publish_at", SqlValue::Timestamp),
                ("lecture_at", SqlValue::Timestamp),
            ]);

            ids.next_id(Table::MaterialCourse);
            material_course.rows.push(vec![
                ("id", SqlValue::Default),
                ("material_id", SqlValue::Int(material_id)),
                ("course_id", SqlValue::Int(course_id)),
            ]);
        }

        (materials, material_course)
    }

    /// Every student joins one random group
    fn generate_user_group(
        &mut self,
        ids: &mut IdTracker,
        students: &[i64],
        group_ids: &[i64],
    ) -> TableData {
        let mut data = TableData::new(Table::UserGroup);
        if group_ids.is_empty() {
            return data;
        }

        for &student_id in students {
            ids.next_id(Table::UserGroup);
            let group_id = self.fake.pick_id(group_ids);
            data.rows.push(vec![
                ("id", SqlValue::Default),
                ("user_id", SqlValue::Int(student_id)),
                ("group_id", SqlValue::Int(group_id)),
            ]);
        }

        data
    }

    fn generate_exams(&mut self, ids: &mut IdTracker, course_id: i64) -> (TableData, Vec<i64>) {
        let mut data = TableData::new(Table::Exams);
        let mut exam_ids = Vec::new();
        let names = self.config.exams.clone();

        for name in names {
            exam_ids.push(ids.next_id(Table::Exams));
            let description = self.fake.text(TEXT_MAX_CHARS);

            data.rows.push(vec![
                ("id", SqlValue::Default),
                ("created_at", SqlValue::Timestamp),
                ("updated_at", SqlValue::Timestamp),
                ("name", SqlValue::Str(name)),
                ("description", SqlValue::Str(description)),
                ("exam_time", SqlValue::Str(time_stamp(self.begins_at))),
                ("course_id", SqlValue::Int(course_id)),
            ]);
        }

        (data, exam_ids)
    }

    fn generate_user_exam(
        &mut self,
        ids: &mut IdTracker,
        students: &[i64],
        exam_ids: &[i64],
    ) -> TableData {
        let mut data = TableData::new(Table::UserExam);

        for &exam_id in exam_ids {
            for &student_id in students {
                ids.next_id(Table::UserExam);
                data.rows.push(vec![
                    ("id", SqlValue::Default),
                    ("user_id", SqlValue::Int(student_id)),
                    ("exam_id", SqlValue::Int(exam_id)),
                    ("status", SqlValue::Int(0)),
                    ("mark", SqlValue::str(EXAM_MARK)),
                ]);
            }
        }

        data
    }
}
