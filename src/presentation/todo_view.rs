use crate::domain::todo::{Todo, TodoId};

/// Client-side list of todos, only ever rebuilt or patched from confirmed service results.
///
/// Entries stay in the store's order: newest `created_at` first, ties by higher id.
#[derive(Debug, Default, Clone)]
pub struct TodoView {
    items: Vec<Todo>,
}

impl TodoView {
    pub fn new() -> Self { Self::default() }

    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.items = todos;
        self.sort();
    }

    pub fn apply_created(&mut self, todo: Todo) { self.upsert(todo) }

    pub fn apply_updated(&mut self, todo: Todo) { self.upsert(todo) }

    /// Drops `id` after any confirmed delete, including `success: false` (the row was already gone).
    /// Returns whether the view still held it.
    pub fn apply_deleted(&mut self, id: TodoId) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() < before
    }

    pub fn items(&self) -> &[Todo] { &self.items }

    pub fn get(&self, index: usize) -> Option<&Todo> { self.items.get(index) }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn completed_count(&self) -> usize { self.items.iter().filter(|t| t.completed).count() }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            "No tasks yet".to_string()
        } else {
            format!("{} of {} completed", self.completed_count(), self.len())
        }
    }

    fn upsert(&mut self, todo: Todo) {
        match self.items.iter_mut().find(|t| t.id == todo.id) {
            Some(existing) => *existing = todo,
            None => {
                self.items.push(todo);
                self.sort();
            }
        }
    }

    fn sort(&mut self) {
        self.items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    }
}
