mod task_choice;

pub use task_choice::*;
