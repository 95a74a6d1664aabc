pub mod memory_store;
pub mod task_dto;
pub mod task_filter;
pub mod task_handlers;
pub mod task_models;
pub mod task_query;
pub mod task_repository;
pub mod task_service;

pub use memory_store::MemoryTaskStore;
pub use task_dto::{FilterParams, QuickAddForm, TaskForm, TaskListView, ToggleTaskRequest, ToggleTaskResponse};
pub use task_filter::{derive_due_date, select, TaskFilter, ViewSummary};
pub use task_models::{NewTask, Task, TaskChanges, TaskPriority};
pub use task_query::{TaskOrdering, TaskPredicate, TaskQuery};
pub use task_repository::{PgTaskStore, TaskStore};
pub use task_service::TaskService;
