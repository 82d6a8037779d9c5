use daybook_shared::{
  DayView,
  GridCell,
  WEEKDAY_LABELS
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CalendarGridProps {
  pub days:   Vec<DayView>,
  pub on_day: Callback<u32>
}

#[function_component(CalendarGrid)]
pub fn calendar_grid(
  props: &CalendarGridProps
) -> Html {
  html! {
      <>
          <div class="calendar-weekday-row">
              {
                  for WEEKDAY_LABELS.iter().map(|label| html! {
                      <div class="calendar-weekday">{ *label }</div>
                  })
              }
          </div>
          <div class="calendar-grid">
              {
                  for props.days.iter().map(|view| match view.cell {
                      | GridCell::Blank => html! {
                          <div class="calendar-blank"></div>
                      },
                      | GridCell::Day { day, .. } => {
                          let on_day = props.on_day.clone();
                          html! {
                              <button
                                  type="button"
                                  class={classes!(
                                      "calendar-day-cell",
                                      view.highlighted.then_some("has-tasks"),
                                      view.selected.then_some("selected")
                                  )}
                                  onclick={Callback::from(move |_| on_day.emit(day))}
                              >
                                  { day }
                              </button>
                          }
                      }
                  })
              }
          </div>
      </>
  }
}
