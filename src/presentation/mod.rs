pub mod todo_view;
