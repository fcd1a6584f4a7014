use leptos::prelude::*;
use web_sys::{DragEvent, KeyboardEvent};

use crate::core::models::Task;
use crate::features::kanban::hooks::BoardHandle;
use crate::features::kanban::reconciler::DragTarget;

#[component]
pub fn TaskCard(task: Task, board: BoardHandle) -> impl IntoView {
    let id_for_start = task.id.clone();
    let id_for_over = task.id.clone();
    let id_for_drop = task.id.clone();
    let id_for_class = task.id.clone();
    let id_for_key = task.id.clone();
    let status = task.status;

    let on_dragstart = move |ev: DragEvent| {
        // Firefox will not start a drag without some payload
        if let Some(transfer) = ev.data_transfer() {
            let _ = transfer.set_data("text/plain", &id_for_start);
        }
        board.drag_start(id_for_start.clone());
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        board.drag_over(DragTarget::Task(id_for_over.clone()));
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        board.drop_on(DragTarget::Task(id_for_drop.clone()));
    };

    // Arrow keys move the card one column; Escape abandons an open gesture
    let on_keydown = move |ev: KeyboardEvent| {
        let target = match ev.key().as_str() {
            "ArrowLeft" => status.previous(),
            "ArrowRight" => status.next(),
            "Escape" => {
                board.drag_end();
                return;
            }
            _ => return,
        };
        ev.prevent_default();
        if let Some(target) = target {
            board.move_task(id_for_key.clone(), target);
        }
    };

    let priority = task.priority.clone().unwrap_or_default();
    let priority_color = task.priority_color();
    let project_title = task.project.as_ref().and_then(|p| p.title()).map(str::to_string);
    let due_date = task.due_date.map(|d| d.format("%b %e, %Y").to_string());
    let assignee = task
        .assigned_to
        .as_ref()
        .and_then(|a| a.name().map(|name| (a.initial().unwrap_or('?'), name.to_string())));

    view! {
        <div
            class="task-card"
            class:dragging=move || board.is_active(&id_for_class)
            draggable="true"
            tabindex="0"
            aria-label=format!("{} ({})", task.title, status.as_str())
            on:dragstart=on_dragstart
            on:dragover=on_dragover
            on:drop=on_drop
            on:dragend=move |_| board.drag_end()
            on:keydown=on_keydown
        >
            <h3 class="task-title">{task.title.clone()}</h3>
            {task.description.clone().filter(|d| !d.is_empty()).map(|d| view! {
                <p class="task-description">{d}</p>
            })}
            <div class="task-meta">
                <span
                    class="task-priority"
                    style=format!("background-color: {}20; color: {}", priority_color, priority_color)
                >
                    {priority}
                </span>
                {project_title.map(|title| view! { <span class="task-project">"📁 " {title}</span> })}
                {due_date.map(|due| view! { <span class="task-due-date">"📅 " {due}</span> })}
            </div>
            {assignee.map(|(initial, name)| view! {
                <div class="task-assignee">
                    <div class="assignee-avatar">{initial.to_string()}</div>
                    <span>{name}</span>
                </div>
            })}
        </div>
    }
}
