//! Turning a [`Reply`] into output text, either human-readable or JSON.

use serde_json::json;

use crate::commands::Reply;

pub const FAREWELL: &str = "Good bye!";

/// Plain-text rendering, one item per line.
pub fn render_text(reply: &Reply) -> String {
  match reply {
    Reply::Message(m) => m.clone(),
    Reply::Record(r) => r.to_string(),
    Reply::Records(rs) => lines(rs.iter().map(ToString::to_string)),
    Reply::Upcoming(us) => lines(us.iter().map(|u| format!("{}: {}", u.name, u.formatted_date()))),
    Reply::Notifications(ns) => lines(ns.iter().map(|(name, bday)| format!("{name}: {bday}"))),
    Reply::History(hs) => lines(hs.iter().map(ToString::to_string)),
    Reply::Groups(gs) => lines(gs.iter().map(|g| {
      let mut line = format!("{}: {}", g.name, g.members.join(", "));
      if !g.dangling.is_empty() {
        line.push_str(&format!(" (deleted: {})", g.dangling.join(", ")));
      }
      line
    })),
    Reply::Exit => FAREWELL.to_owned(),
  }
}

/// Pretty-printed JSON rendering.
pub fn render_json(reply: &Reply) -> serde_json::Result<String> {
  let value = match reply {
    Reply::Message(m) => json!({ "message": m }),
    Reply::Record(r) => serde_json::to_value(r)?,
    Reply::Records(rs) => serde_json::to_value(rs)?,
    Reply::Upcoming(us) => serde_json::to_value(us)?,
    Reply::Notifications(ns) => serde_json::to_value(
      ns.iter()
        .map(|(name, birthday)| json!({ "name": name, "birthday": birthday }))
        .collect::<Vec<_>>(),
    )?,
    Reply::History(hs) => serde_json::to_value(hs)?,
    Reply::Groups(gs) => serde_json::to_value(gs)?,
    Reply::Exit => json!({ "message": FAREWELL }),
  };
  serde_json::to_string_pretty(&value)
}

fn lines(items: impl Iterator<Item = String>) -> String { items.collect::<Vec<_>>().join("\n") }

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use rolodex_core::{birthday::UpcomingBirthday, record::Record};

  use super::*;
  use crate::commands::GroupView;

  #[test]
  fn records_render_one_per_line() {
    let mut a = Record::new("A");
    a.add_phone("0500000000").unwrap();
    let b = Record::new("B");
    let text = render_text(&Reply::Records(vec![a, b]));
    assert_eq!(text.lines().count(), 2);
    assert!(text.starts_with("Name: A, Phones: 0500000000"));
  }

  #[test]
  fn upcoming_uses_year_first_dates() {
    let reply = Reply::Upcoming(vec![UpcomingBirthday {
      name:                "Ann".into(),
      congratulation_date: NaiveDate::from_ymd_opt(2024, 6, 17).unwrap(),
    }]);
    assert_eq!(render_text(&reply), "Ann: 2024.06.17");

    let value: serde_json::Value = serde_json::from_str(&render_json(&reply).unwrap()).unwrap();
    assert_eq!(value[0]["congratulation_date"], "2024.06.17");
  }

  #[test]
  fn groups_flag_deleted_members() {
    let reply = Reply::Groups(vec![GroupView {
      name:     "team".into(),
      members:  vec!["Bob".into()],
      dangling: vec!["Alice".into()],
    }]);
    assert_eq!(render_text(&reply), "team: Bob (deleted: Alice)");
  }

  #[test]
  fn message_json_is_wrapped() {
    let out = render_json(&Reply::Message("ok".into())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["message"], "ok");
  }
}
