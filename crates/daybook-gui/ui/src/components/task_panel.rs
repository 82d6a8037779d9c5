use web_sys::{
  HtmlInputElement,
  InputEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskPanelProps {
  pub heading:      String,
  pub draft:        String,
  pub submit_label: String,
  pub tasks:        Vec<String>,
  pub on_input:     Callback<String>,
  pub on_submit:    Callback<()>,
  pub on_edit:      Callback<usize>,
  pub on_delete:    Callback<usize>
}

#[function_component(TaskPanel)]
pub fn task_panel(
  props: &TaskPanelProps
) -> Html {
  let oninput = {
    let on_input =
      props.on_input.clone();
    Callback::from(
      move |event: InputEvent| {
        let input: HtmlInputElement =
          event.target_unchecked_into();
        on_input.emit(input.value());
      }
    )
  };

  let onsubmit = {
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |event: SubmitEvent| {
        event.prevent_default();
        on_submit.emit(());
      }
    )
  };

  let rows = if props.tasks.is_empty() {
    html! { <li class="task-empty">{ "No tasks" }</li> }
  } else {
    props
      .tasks
      .iter()
      .enumerate()
      .map(|(index, task)| {
        let on_edit =
          props.on_edit.clone();
        let on_delete =
          props.on_delete.clone();
        html! {
            <li class="task-row">
                <span class="task-text">{ task.clone() }</span>
                <div class="task-actions">
                    <button
                        type="button"
                        class="btn task-edit"
                        aria-label="Edit task"
                        onclick={Callback::from(move |_| on_edit.emit(index))}
                    >
                        { "Edit" }
                    </button>
                    <button
                        type="button"
                        class="btn task-delete"
                        aria-label="Delete task"
                        onclick={Callback::from(move |_| on_delete.emit(index))}
                    >
                        { "Delete" }
                    </button>
                </div>
            </li>
        }
      })
      .collect::<Html>()
  };

  html! {
      <div class="task-panel">
          <h3 class="task-heading">{ props.heading.clone() }</h3>
          <form class="task-form" {onsubmit}>
              <input
                  type="text"
                  class="task-input"
                  placeholder="Enter a task"
                  value={props.draft.clone()}
                  {oninput}
              />
              <button type="submit" class="btn task-submit">
                  { props.submit_label.clone() }
              </button>
          </form>
          <ul class="task-list">{ rows }</ul>
      </div>
  }
}
