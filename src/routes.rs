use crate::{
    admin::admin_authorization,
    analytics::{analytics_handlers, analytics_models},
    announcement::{announcement_dto, announcement_handlers, announcement_models},
    assignment::{assignment_dto, assignment_handlers, assignment_models},
    attendance::{attendance_dto, attendance_handlers, attendance_models},
    auth::{auth_dto, auth_handlers, Identity},
    chat::{chat_dto, chat_handlers, chat_models},
    document::{document_handlers, document_models},
    enrollment::{enrollment_dto, enrollment_handlers, enrollment_models},
    message::{conversation, message_dto, message_handlers, message_models},
    middleware::auth_middleware,
    program::{program_dto, program_handlers, program_models},
    state::AppState,
    user::{user_dto, user_handlers, user_models},
};
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::refresh_token,
        auth_handlers::logout,
        user_handlers::get_current_user,
        user_handlers::get_all_users,
        user_handlers::get_user_by_id,
        user_handlers::update_user,
        user_handlers::delete_user,
        user_handlers::list_students,
        program_handlers::create_program,
        program_handlers::get_programs,
        program_handlers::get_my_programs,
        program_handlers::get_program,
        enrollment_handlers::create_enrollment,
        enrollment_handlers::get_my_enrollments,
        enrollment_handlers::get_program_enrollments,
        enrollment_handlers::get_all_enrollments,
        enrollment_handlers::update_enrollment_status,
        enrollment_handlers::delete_enrollment,
        assignment_handlers::create_assignment,
        assignment_handlers::get_program_assignments,
        assignment_handlers::get_assignment,
        assignment_handlers::get_my_assignments,
        assignment_handlers::submit_assignment,
        assignment_handlers::grade_submission,
        assignment_handlers::create_comment,
        attendance_handlers::mark_attendance,
        attendance_handlers::get_program_attendance,
        attendance_handlers::get_attendance_stats,
        attendance_handlers::get_my_attendance,
        attendance_handlers::get_student_attendance,
        announcement_handlers::create_announcement,
        announcement_handlers::get_program_announcements,
        announcement_handlers::get_my_announcements,
        announcement_handlers::get_announcement,
        announcement_handlers::create_announcement_comment,
        message_handlers::send_message,
        message_handlers::get_conversations,
        message_handlers::get_conversation,
        message_handlers::mark_conversation_read,
        message_handlers::mark_message_read,
        message_handlers::get_unread_count,
        message_handlers::get_inbox,
        message_handlers::create_group,
        message_handlers::get_groups,
        message_handlers::get_group_messages,
        message_handlers::message_stream,
        chat_handlers::send_chat_message,
        chat_handlers::get_chat_sessions,
        chat_handlers::get_chat_messages,
        document_handlers::upload_document,
        document_handlers::get_my_documents,
        document_handlers::get_user_documents,
        document_handlers::get_enrollment_documents,
        document_handlers::delete_document,
        analytics_handlers::get_enrollment_trends,
        analytics_handlers::get_program_popularity,
        analytics_handlers::get_enrollment_status_distribution,
        analytics_handlers::get_program_status_distribution,
        analytics_handlers::get_user_role_distribution,
        analytics_handlers::get_recent_activity,
        analytics_handlers::get_completion_rates,
        analytics_handlers::get_dashboard_summary,
        analytics_handlers::get_upcoming_sessions,
    ),
    components(
        schemas(
            auth_dto::RegisterRequest,
            auth_dto::LoginRequest,
            auth_dto::AuthResponse,
            auth_dto::RefreshTokenRequest,
            auth_dto::RefreshTokenResponse,
            Identity,
            user_models::UserRole,
            user_models::UserResponse,
            user_models::UserSummary,
            user_dto::UpdateUserRequest,
            user_dto::UserWithEnrollmentCount,
            user_dto::UserDetailResponse,
            user_dto::StudentListItem,
            program_models::Program,
            program_models::ProgramStatus,
            program_models::ProgramSummary,
            program_dto::CreateProgramRequest,
            enrollment_models::Enrollment,
            enrollment_models::EnrollmentStatus,
            enrollment_models::EnrollmentWithProgram,
            enrollment_models::EnrollmentDetail,
            enrollment_models::ProgramEnrollee,
            enrollment_dto::CreateEnrollmentRequest,
            enrollment_dto::UpdateEnrollmentStatusRequest,
            assignment_models::Assignment,
            assignment_models::AssignmentListItem,
            assignment_models::AssignmentWithProgram,
            assignment_models::AssignmentDetail,
            assignment_models::AssignmentProgress,
            assignment_models::StudentAssignment,
            assignment_models::Submission,
            assignment_models::SubmissionStatus,
            assignment_models::SubmissionWithStudent,
            assignment_models::Comment,
            assignment_models::CommentWithAuthor,
            assignment_dto::CreateAssignmentRequest,
            assignment_dto::SubmitAssignmentRequest,
            assignment_dto::GradeSubmissionRequest,
            assignment_dto::CreateCommentRequest,
            attendance_models::Attendance,
            attendance_models::AttendanceStatus,
            attendance_models::AttendanceWithProgram,
            attendance_models::RosterEntry,
            attendance_models::AttendanceStats,
            attendance_dto::MarkAttendanceRequest,
            announcement_models::Announcement,
            announcement_models::AnnouncementListItem,
            announcement_models::AnnouncementComment,
            announcement_models::AnnouncementCommentWithAuthor,
            announcement_models::AnnouncementDetail,
            announcement_dto::CreateAnnouncementRequest,
            announcement_dto::CreateAnnouncementCommentRequest,
            message_models::Message,
            message_models::MessageView,
            message_models::MessageGroup,
            message_models::GroupListItem,
            conversation::Conversation,
            conversation::Inbox,
            message_dto::SendMessageRequest,
            message_dto::CreateGroupRequest,
            message_dto::UnreadCountResponse,
            chat_models::ChatSession,
            chat_models::ChatMessage,
            chat_models::ChatExchange,
            chat_dto::SendChatMessageRequest,
            document_models::Document,
            document_models::UploadDocumentForm,
            analytics_models::ChartPoint,
            analytics_models::RecentActivity,
            analytics_models::DashboardSummary,
            analytics_models::UpcomingSession,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token rotation"),
        (name = "users", description = "Current user and student records"),
        (name = "admin", description = "Administrator endpoints"),
        (name = "programs", description = "Educational programs"),
        (name = "enrollments", description = "Program enrollments"),
        (name = "assignments", description = "Assignments, submissions and comments"),
        (name = "attendance", description = "Attendance marking and reports"),
        (name = "announcements", description = "Program announcements"),
        (name = "messages", description = "Direct and group messaging"),
        (name = "chat", description = "AI assistant chat"),
        (name = "documents", description = "Student documents"),
        (name = "analytics", description = "Dashboard analytics")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Wraps a router so every route requires a valid access token.
fn authenticated(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ))
}

/// Admin-only routes; the token check runs before the role check.
fn admin_only(state: &AppState, router: Router<AppState>) -> Router<AppState> {
    authenticated(
        state,
        router.route_layer(middleware::from_fn(admin_authorization)),
    )
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/refresh", post(auth_handlers::refresh_token))
        .route("/logout", post(auth_handlers::logout));

    // Protected routes (auth required)
    let user_routes = authenticated(
        &state,
        Router::new()
            .route("/me", get(user_handlers::get_current_user))
            .route("/:id/attendance", get(attendance_handlers::get_student_attendance))
            .route("/:id/documents", get(document_handlers::get_user_documents)),
    );

    let program_routes = authenticated(
        &state,
        Router::new()
            .route(
                "/",
                get(program_handlers::get_programs).post(program_handlers::create_program),
            )
            .route("/mine", get(program_handlers::get_my_programs))
            .route("/:id", get(program_handlers::get_program))
            .route("/:id/enrollments", get(enrollment_handlers::get_program_enrollments))
            .route("/:id/assignments", get(assignment_handlers::get_program_assignments))
            .route("/:id/attendance", get(attendance_handlers::get_program_attendance))
            .route("/:id/attendance/stats", get(attendance_handlers::get_attendance_stats))
            .route(
                "/:id/announcements",
                get(announcement_handlers::get_program_announcements),
            ),
    );

    let enrollment_routes = authenticated(
        &state,
        Router::new()
            .route("/", post(enrollment_handlers::create_enrollment))
            .route("/me", get(enrollment_handlers::get_my_enrollments))
            .route("/:id/documents", get(document_handlers::get_enrollment_documents)),
    );

    let assignment_routes = authenticated(
        &state,
        Router::new()
            .route("/", post(assignment_handlers::create_assignment))
            .route("/me", get(assignment_handlers::get_my_assignments))
            .route("/:id", get(assignment_handlers::get_assignment))
            .route("/:id/submissions", post(assignment_handlers::submit_assignment)),
    );

    let submission_routes = authenticated(
        &state,
        Router::new().route("/:id/grade", put(assignment_handlers::grade_submission)),
    );

    let comment_routes = authenticated(
        &state,
        Router::new().route("/", post(assignment_handlers::create_comment)),
    );

    let attendance_routes = authenticated(
        &state,
        Router::new()
            .route("/", post(attendance_handlers::mark_attendance))
            .route("/me", get(attendance_handlers::get_my_attendance)),
    );

    let announcement_routes = authenticated(
        &state,
        Router::new()
            .route("/", post(announcement_handlers::create_announcement))
            .route("/me", get(announcement_handlers::get_my_announcements))
            .route("/:id", get(announcement_handlers::get_announcement))
            .route(
                "/:id/comments",
                post(announcement_handlers::create_announcement_comment),
            ),
    );

    let message_routes = authenticated(
        &state,
        Router::new()
            .route("/", post(message_handlers::send_message))
            .route("/stream", get(message_handlers::message_stream))
            .route("/conversations", get(message_handlers::get_conversations))
            .route(
                "/conversations/:user_id",
                get(message_handlers::get_conversation),
            )
            .route(
                "/conversations/:user_id/read",
                post(message_handlers::mark_conversation_read),
            )
            .route("/unread-count", get(message_handlers::get_unread_count))
            .route("/inbox", get(message_handlers::get_inbox))
            .route(
                "/groups",
                get(message_handlers::get_groups).post(message_handlers::create_group),
            )
            .route("/groups/:id", get(message_handlers::get_group_messages))
            .route("/:id/read", put(message_handlers::mark_message_read)),
    );

    let chat_routes = authenticated(
        &state,
        Router::new()
            .route("/", post(chat_handlers::send_chat_message))
            .route("/sessions", get(chat_handlers::get_chat_sessions))
            .route("/sessions/:id/messages", get(chat_handlers::get_chat_messages)),
    );

    let document_routes = authenticated(
        &state,
        Router::new()
            .route("/", post(document_handlers::upload_document))
            .route("/me", get(document_handlers::get_my_documents))
            .route("/:id", axum::routing::delete(document_handlers::delete_document)),
    );

    let admin_routes = admin_only(
        &state,
        Router::new()
            .route("/users", get(user_handlers::get_all_users))
            .route(
                "/users/:id",
                get(user_handlers::get_user_by_id)
                    .put(user_handlers::update_user)
                    .delete(user_handlers::delete_user),
            )
            .route("/students", get(user_handlers::list_students))
            .route("/enrollments", get(enrollment_handlers::get_all_enrollments))
            .route(
                "/enrollments/:id",
                axum::routing::delete(enrollment_handlers::delete_enrollment),
            )
            .route(
                "/enrollments/:id/status",
                put(enrollment_handlers::update_enrollment_status),
            ),
    );

    let analytics_routes = admin_only(
        &state,
        Router::new()
            .route("/enrollment-trends", get(analytics_handlers::get_enrollment_trends))
            .route("/program-popularity", get(analytics_handlers::get_program_popularity))
            .route(
                "/enrollment-status",
                get(analytics_handlers::get_enrollment_status_distribution),
            )
            .route(
                "/program-status",
                get(analytics_handlers::get_program_status_distribution),
            )
            .route("/user-roles", get(analytics_handlers::get_user_role_distribution))
            .route("/recent-activity", get(analytics_handlers::get_recent_activity))
            .route("/completion-rates", get(analytics_handlers::get_completion_rates))
            .route("/summary", get(analytics_handlers::get_dashboard_summary))
            .route("/upcoming-sessions", get(analytics_handlers::get_upcoming_sessions)),
    );

    // Combine all routes
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/programs", program_routes)
        .nest("/enrollments", enrollment_routes)
        .nest("/assignments", assignment_routes)
        .nest("/submissions", submission_routes)
        .nest("/comments", comment_routes)
        .nest("/attendance", attendance_routes)
        .nest("/announcements", announcement_routes)
        .nest("/messages", message_routes)
        .nest("/chat", chat_routes)
        .nest("/documents", document_routes)
        .nest("/admin", admin_routes)
        .nest("/analytics", analytics_routes);

    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::create_access_token, state::Config, user::UserRole};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "router-test-secret";

    // The pool never connects; every request below is settled before the database.
    fn test_app() -> Router {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/edubridge_test".to_string()),
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        create_router(AppState::new(pool, Arc::new(config)))
    }

    fn bearer(role: UserRole) -> String {
        let token = create_access_token(Uuid::new_v4(), "someone@example.com", role, SECRET).unwrap();
        format!("Bearer {}", token)
    }

    fn json_request(method: &str, uri: &str, auth: Option<String>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = test_app()
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/enrollments"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = test_app()
            .oneshot(Request::get("/api/users/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["kind"], "unauthorized");
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let request = Request::get("/api/enrollments/me")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_validation_error() {
        let request = json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "name": "Ada Lovelace",
                "email": "not-an-email",
                "password": "secret123",
                "phone": "0123456789"
            }),
        );
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn test_student_cannot_create_program() {
        let request = json_request(
            "POST",
            "/api/programs",
            Some(bearer(UserRole::Student)),
            json!({
                "name": "Data Science",
                "description": "An introduction to data science",
                "duration": 12,
                "capacity": 20
            }),
        );
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["kind"], "forbidden");
    }

    #[tokio::test]
    async fn test_admin_routes_reject_students() {
        let request = Request::get("/api/admin/users")
            .header(header::AUTHORIZATION, bearer(UserRole::Student))
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_analytics_require_token_before_role() {
        let response = test_app()
            .oneshot(Request::get("/api/analytics/summary").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_message_needs_exactly_one_target() {
        let request = json_request(
            "POST",
            "/api/messages",
            Some(bearer(UserRole::Student)),
            json!({ "content": "hello" }),
        );
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "validation");
    }
}
