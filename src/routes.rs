use crate::{
    auth::{self, LoginForm, SignupForm, SignupRejected},
    middleware::session_middleware,
    notification::{
        self,
        notification_dto::{DueNotification, PendingTask},
        NotificationsResponse, PendingTasksResponse,
    },
    state::AppState,
    statistics::{self, Statistics},
    task::{
        self,
        task_dto::ToggleTaskError,
        QuickAddForm, Task, TaskForm, TaskListView, TaskPriority, ToggleTaskRequest,
        ToggleTaskResponse, ViewSummary,
    },
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        task::task_handlers::list_tasks,
        task::task_handlers::add_task,
        task::task_handlers::quick_add_task,
        task::task_handlers::get_task,
        task::task_handlers::edit_task,
        task::task_handlers::delete_task,
        task::task_handlers::toggle_task,
        notification::notification_handlers::check_notifications,
        notification::notification_handlers::notifications_count,
        statistics::statistics_handlers::get_statistics,
        auth::auth_handlers::signup,
        auth::auth_handlers::login,
        auth::auth_handlers::logout,
    ),
    components(
        schemas(
            Task,
            TaskPriority,
            TaskForm,
            QuickAddForm,
            TaskListView,
            ViewSummary,
            ToggleTaskRequest,
            ToggleTaskResponse,
            ToggleTaskError,
            DueNotification,
            NotificationsResponse,
            PendingTask,
            PendingTasksResponse,
            Statistics,
            SignupForm,
            LoginForm,
            SignupRejected,
        )
    ),
    tags(
        (name = "tasks", description = "Task views and editing"),
        (name = "notifications", description = "Due-soon polling"),
        (name = "statistics", description = "Completion statistics"),
        (name = "auth", description = "Signup, login and logout")
    )
)]
struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let task_routes = Router::new()
        .route("/", get(task::task_handlers::index))
        .route("/tasks/", get(task::task_handlers::list_tasks))
        .route("/add/", post(task::task_handlers::add_task))
        .route("/quick_add/", post(task::task_handlers::quick_add_task))
        .route(
            "/edit/:id/",
            get(task::task_handlers::get_task).post(task::task_handlers::edit_task),
        )
        .route("/delete/:id/", post(task::task_handlers::delete_task));

    let api_routes = Router::new()
        .route("/toggle-task/:id/", post(task::task_handlers::toggle_task))
        .route(
            "/notifications/",
            get(notification::notification_handlers::check_notifications),
        )
        .route(
            "/notifications/count/",
            get(notification::notification_handlers::notifications_count),
        )
        .route(
            "/statistics/",
            get(statistics::statistics_handlers::get_statistics),
        );

    let auth_routes = Router::new()
        .route("/signup/", post(auth::signup))
        .route("/login/", post(auth::login))
        .route("/logout/", get(auth::logout).post(auth::logout));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(task_routes)
        .merge(auth_routes)
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
