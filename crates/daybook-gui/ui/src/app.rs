use chrono::Local;
use daybook_shared::Session;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_force_update,
  use_mut_ref
};

use crate::components::{
  CalendarGrid,
  TaskPanel
};
use crate::storage::{
  LocalStorageRepository,
  TASKS_STORAGE_KEY
};

fn open_session()
-> Session<LocalStorageRepository> {
  Session::open(
    LocalStorageRepository::new(
      TASKS_STORAGE_KEY
    ),
    Local::now().date_naive()
  )
}

fn report(
  action: &str,
  result: anyhow::Result<()>
) {
  if let Err(error) = result {
    tracing::error!(
      action,
      error = %format!("{error:#}"),
      "calendar action failed"
    );
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let session = use_mut_ref(open_session);
  let trigger = use_force_update();

  let on_day = {
    let session = session.clone();
    let trigger = trigger.clone();
    Callback::from(move |day: u32| {
      session.borrow_mut().click_day(day);
      trigger.force_update();
    })
  };

  let on_input = {
    let session = session.clone();
    let trigger = trigger.clone();
    Callback::from(move |text: String| {
      session.borrow_mut().set_draft(text);
      trigger.force_update();
    })
  };

  let on_submit = {
    let session = session.clone();
    let trigger = trigger.clone();
    Callback::from(move |()| {
      let result = session
        .borrow_mut()
        .submit()
        .map(|outcome| {
          tracing::debug!(
            ?outcome,
            "submitted task form"
          );
        });
      report("submit", result);
      trigger.force_update();
    })
  };

  let on_edit = {
    let session = session.clone();
    let trigger = trigger.clone();
    Callback::from(move |index: usize| {
      let result = session
        .borrow_mut()
        .begin_edit(index)
        .map(|_| ());
      report("edit", result);
      trigger.force_update();
    })
  };

  let on_delete = {
    let session = session.clone();
    let trigger = trigger.clone();
    Callback::from(move |index: usize| {
      let result = session
        .borrow_mut()
        .delete(index)
        .map(|_| ());
      report("delete", result);
      trigger.force_update();
    })
  };

  let view = session.borrow();
  let panel = match view.heading() {
    | Some(heading) => {
      let tasks = view
        .selected_tasks()
        .iter()
        .map(|entry| entry.text.clone())
        .collect::<Vec<_>>();
      html! {
          <TaskPanel
              heading={heading}
              draft={view.draft().to_string()}
              submit_label={view.submit_label().to_string()}
              tasks={tasks}
              on_input={on_input}
              on_submit={on_submit}
              on_edit={on_edit}
              on_delete={on_delete}
          />
      }
    }
    | None => Html::default()
  };

  html! {
      <div class="calendar">
          <h2 class="calendar-title">{ view.grid().title() }</h2>
          <CalendarGrid days={view.day_view()} on_day={on_day} />
          { panel }
      </div>
  }
}
