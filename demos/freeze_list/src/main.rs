#![allow(non_snake_case)]

use std::{cell::RefCell, rc::Rc, thread, time::Duration};

use perch_core::*;
use perch_navigation::*;
use perch_ui::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum Screen {
    Tasks,
    Task(usize),
}

#[derive(Clone)]
struct Todo {
    id: usize,
    title: String,
    completed: bool,
}

type TaskList = Rc<RefCell<Freeze<ScrollPreservingList<Todo>>>>;

const FRAME: Duration = Duration::from_millis(16);

fn todos() -> Vec<Todo> {
    (0..1000)
        .map(|i| Todo {
            id: i,
            title: format!("Task #{}", i + 1),
            completed: i % 3 == 0,
        })
        .collect()
}

fn task_list(e: &EntryScope<Screen>) -> TaskList {
    e.remember_saveable("tasks", || {
        Freeze::new(|| {
            let props = LazyListProps::new(todos(), 50.0, |todo: &Todo, _idx| {
                let mark = if todo.completed { "✓" } else { "○" };
                Row(todo.id, format!("{mark} {}", todo.title))
            })
            .on_scroll(|ev| log::trace!("scrolled to {}px", ev.offset_y));
            ScrollPreservingList::mount(props)
        })
    })
}

fn Row(id: usize, label: String) -> View {
    Box().id(id as ViewId).child(Text(label))
}

/// Three quick strokes and a lift, then frames until the fling comes to rest.
fn fling(list: &mut ScrollPreservingList<Todo>) -> f32 {
    for _ in 0..3 {
        list.drag(40.0);
        thread::sleep(FRAME);
    }
    list.release();
    while list.tick() == Motion::Moving {
        thread::sleep(FRAME);
    }
    list.offset()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting freeze/unfreeze list demo");

    let stack = NavBackStack::new(Screen::Tasks);
    let nav = stack.navigator();

    let tasks = stack
        .compose(task_list)
        .ok_or_else(|| anyhow::anyhow!("empty back stack"))?;
    let settled = {
        let mut f = tasks.borrow_mut();
        let list = f
            .content_mut()
            .ok_or_else(|| anyhow::anyhow!("task list not mounted"))?;
        fling(list)
    };
    log::info!("list came to rest at {settled}px");

    // Open a task; the list screen is covered, so its content is frozen.
    nav.push(Screen::Task(42));
    tasks.borrow_mut().freeze();
    stack.compose(|e| {
        if let Screen::Task(id) = e.key() {
            log::info!("showing task #{}", id + 1);
        }
    });
    log::info!("back stack: {}", stack.to_json());

    nav.pop();
    let restored = stack
        .compose(|e| {
            let list = task_list(e);
            list.borrow_mut().unfreeze();
            list
        })
        .ok_or_else(|| anyhow::anyhow!("empty back stack"))?;

    let f = restored.borrow();
    let list = f
        .content()
        .ok_or_else(|| anyhow::anyhow!("task list not mounted after unfreeze"))?;
    log::info!(
        "back on {:?}: offset {}px ({:?})",
        Screen::Tasks,
        list.offset(),
        list.last_restore()
    );
    anyhow::ensure!(
        list.offset() == settled,
        "scroll position lost: {} != {settled}",
        list.offset()
    );
    Ok(())
}
