use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::enums::{CourseStatus, Program, Semester, StudyLevel};
use crate::modules::academic_periods::model::{
    AcademicPeriod, CreateAcademicPeriodDto, UpdateAcademicPeriodDto,
};
use crate::modules::academic_years::model::{
    AcademicYear, CreateAcademicYearDto, PromoteLevelDto, SetActiveSemesterDto,
    UpdateAcademicYearDto,
};
use crate::modules::auth::model::{LoginRequest, TokenResponse};
use crate::modules::courses::model::{Course, CreateCourseDto, UpdateCourseDto};
use crate::modules::departments::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use crate::modules::registrations::model::{
    Registration, RegistrationContext, SubmitRegistrationDto, UnitSummary,
};
use crate::modules::students::model::{
    CreateStudentDto, ResetPasswordDto, StudentResponse, UpdateStudentDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_student,
        crate::modules::auth::controller::get_student_profile,
        crate::modules::academic_years::controller::create_academic_year,
        crate::modules::academic_years::controller::get_academic_years,
        crate::modules::academic_years::controller::get_academic_year_by_id,
        crate::modules::academic_years::controller::update_academic_year,
        crate::modules::academic_years::controller::delete_academic_year,
        crate::modules::academic_years::controller::set_active_semester,
        crate::modules::academic_years::controller::promote_level,
        crate::modules::academic_periods::controller::create_academic_period,
        crate::modules::academic_periods::controller::get_academic_periods,
        crate::modules::academic_periods::controller::get_academic_period_by_id,
        crate::modules::academic_periods::controller::update_academic_period,
        crate::modules::academic_periods::controller::delete_academic_period,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department_by_id,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_eligible_courses,
        crate::modules::courses::controller::get_course_by_id,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student_by_id,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::reset_student_password,
        crate::modules::students::controller::delete_student,
        crate::modules::registrations::controller::get_registration_context,
        crate::modules::registrations::controller::submit_registration,
    ),
    components(
        schemas(
            Program,
            Semester,
            StudyLevel,
            CourseStatus,
            AcademicYear,
            CreateAcademicYearDto,
            UpdateAcademicYearDto,
            SetActiveSemesterDto,
            PromoteLevelDto,
            AcademicPeriod,
            CreateAcademicPeriodDto,
            UpdateAcademicPeriodDto,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            StudentResponse,
            CreateStudentDto,
            UpdateStudentDto,
            ResetPasswordDto,
            Registration,
            RegistrationContext,
            UnitSummary,
            SubmitRegistrationDto,
            LoginRequest,
            TokenResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Student login and profile"),
        (name = "Academic Years", description = "Academic year and semester state management"),
        (name = "Academic Periods", description = "Named calendar period management"),
        (name = "Departments", description = "Department directory"),
        (name = "Courses", description = "Course directory and eligibility"),
        (name = "Students", description = "Student record management"),
        (name = "Registrations", description = "Course registration")
    ),
    info(
        title = "Polyreg API",
        version = "0.1.0",
        description = "Academic records and course registration engine built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
