//! Command handlers.
//!
//! Each handler receives the full raw input line, pulls its own positional
//! arguments out of it, and operates on the directory it is handed. Handlers
//! never print; they return a [`Reply`] for the caller to render.

use rolodex_core::{
  Error,
  birthday::UpcomingBirthday,
  directory::{Directory, GroupOutcome, Member},
  record::{ChangeEntry, Record},
};
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use crate::error::CommandError;

pub type CommandResult = Result<Reply, CommandError>;

// ─── Command ──────────────────────────────────────────────────────────────────

/// Every command word the read loop understands. Matching ignores ASCII case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Command {
  Hello,
  Add,
  Change,
  Phone,
  All,
  Delete,
  AddBirthday,
  ShowBirthday,
  Birthdays,
  NotifyBirthdays,
  SearchName,
  Sort,
  History,
  Revert,
  AddGroup,
  RemoveGroup,
  AddToGroup,
  RemoveFromGroup,
  Groups,
  PruneGroups,
  #[strum(to_string = "close", serialize = "exit")]
  Close,
}

impl Command {
  pub fn usage(self) -> &'static str {
    match self {
      Self::Hello => "hello",
      Self::Add => "add <name> <phone>",
      Self::Change => "change <name> <phone> | change <name> <old-phone> <new-phone>",
      Self::Phone => "phone <name>",
      Self::All => "all",
      Self::Delete => "delete <name>",
      Self::AddBirthday => "add-birthday <name> <DD.MM.YYYY>",
      Self::ShowBirthday => "show-birthday <name>",
      Self::Birthdays => "birthdays",
      Self::NotifyBirthdays => "notify-birthdays",
      Self::SearchName => "search-name <text>",
      Self::Sort => "sort <name|phone|birthday>",
      Self::History => "history <name>",
      Self::Revert => "revert <name>",
      Self::AddGroup => "add-group <group>",
      Self::RemoveGroup => "remove-group <group>",
      Self::AddToGroup => "add-to-group <group> <name>",
      Self::RemoveFromGroup => "remove-from-group <group> <name>",
      Self::Groups => "groups",
      Self::PruneGroups => "prune-groups",
      Self::Close => "close | exit",
    }
  }
}

// ─── Reply ────────────────────────────────────────────────────────────────────

/// A group with its members resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
  pub name:     String,
  pub members:  Vec<String>,
  /// Members whose record has been deleted.
  pub dangling: Vec<String>,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
  /// A one-line confirmation or informational notice.
  Message(String),
  Record(Record),
  Records(Vec<Record>),
  Upcoming(Vec<UpcomingBirthday>),
  /// `(name, birthday)` pairs from the notification scan.
  Notifications(Vec<(String, String)>),
  History(Vec<ChangeEntry>),
  Groups(Vec<GroupView>),
  /// Persist and leave the read loop.
  Exit,
}

impl Reply {
  fn message(text: impl Into<String>) -> Self { Self::Message(text.into()) }

  /// `Records`, or `empty` as a message when there are none.
  fn records_or<'a>(records: impl IntoIterator<Item = &'a Record>, empty: &str) -> Self {
    let records: Vec<Record> = records.into_iter().cloned().collect();
    if records.is_empty() {
      Self::message(empty)
    } else {
      Self::Records(records)
    }
  }
}

// ─── Argument parsing ─────────────────────────────────────────────────────────

/// The first whitespace-separated word of `line`.
fn command_word(line: &str) -> Option<&str> { line.split_whitespace().next() }

/// Exactly `N` positional arguments after the command word.
fn args<const N: usize>(command: Command, line: &str) -> Result<[&str; N], CommandError> {
  let args: Vec<&str> = line.split_whitespace().skip(1).collect();
  if args.len() < N {
    return Err(CommandError::MissingArgs(command));
  }
  <[&str; N]>::try_from(args).map_err(|_| CommandError::TooManyArgs(command))
}

fn not_found(name: &str) -> CommandError { Error::NotFound(name.to_owned()).into() }

fn find_mut<'a>(book: &'a mut Directory, name: &str) -> Result<&'a mut Record, CommandError> {
  book.find_mut(name).ok_or_else(|| not_found(name))
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

/// Parse the command word of `line` and run the matching handler.
///
/// Blank lines produce an empty message.
pub fn dispatch(line: &str, book: &mut Directory) -> CommandResult {
  let Some(word) = command_word(line) else {
    return Ok(Reply::message(""));
  };
  let command: Command = word
    .parse()
    .map_err(|_| CommandError::UnknownCommand(word.to_owned()))?;
  tracing::debug!(%command, "dispatching");

  match command {
    Command::Hello => hello(line),
    Command::Add => add_contact(line, book),
    Command::Change => change_contact(line, book),
    Command::Phone => phone(line, book),
    Command::All => all_contacts(line, book),
    Command::Delete => delete_contact(line, book),
    Command::AddBirthday => add_birthday(line, book),
    Command::ShowBirthday => show_birthday(line, book),
    Command::Birthdays => birthdays(line, book),
    Command::NotifyBirthdays => notify_birthdays(line, book),
    Command::SearchName => search_name(line, book),
    Command::Sort => sort_contacts(line, book),
    Command::History => history(line, book),
    Command::Revert => revert(line, book),
    Command::AddGroup => add_group(line, book),
    Command::RemoveGroup => remove_group(line, book),
    Command::AddToGroup => add_to_group(line, book),
    Command::RemoveFromGroup => remove_from_group(line, book),
    Command::Groups => groups(line, book),
    Command::PruneGroups => prune_groups(line, book),
    Command::Close => {
      args::<0>(Command::Close, line)?;
      Ok(Reply::Exit)
    }
  }
}

// ─── Contacts ─────────────────────────────────────────────────────────────────

pub fn hello(line: &str) -> CommandResult {
  args::<0>(Command::Hello, line)?;
  Ok(Reply::message("How can I help you?"))
}

/// Add a phone to `name`, creating the contact on first use.
pub fn add_contact(line: &str, book: &mut Directory) -> CommandResult {
  let [name, phone] = args(Command::Add, line)?;

  let created = book.find(name).is_none();
  if created {
    let mut record = Record::new(name);
    record.add_phone(phone)?;
    record.record_change(format!("created with phone {phone}"));
    book.add_record(record);
    return Ok(Reply::message("Contact added."));
  }

  let record = find_mut(book, name)?;
  record.add_phone(phone)?;
  record.record_change(format!("added phone {phone}"));
  Ok(Reply::message("Contact updated."))
}

/// `change <name> <phone>` appends a phone to an existing contact;
/// `change <name> <old> <new>` replaces one number with another.
pub fn change_contact(line: &str, book: &mut Directory) -> CommandResult {
  let arg_count = line.split_whitespace().count().saturating_sub(1);
  if arg_count == 3 {
    let [name, old, new] = args(Command::Change, line)?;
    let record = find_mut(book, name)?;
    record.edit_phone(old, new)?;
    record.record_change(format!("changed phone {old} to {new}"));
    return Ok(Reply::message("Contact updated."));
  }

  let [name, phone] = args(Command::Change, line)?;
  let record = find_mut(book, name)?;
  record.add_phone(phone)?;
  record.record_change(format!("added phone {phone}"));
  Ok(Reply::message("Contact updated."))
}

pub fn phone(line: &str, book: &Directory) -> CommandResult {
  let [name] = args(Command::Phone, line)?;
  let record = book.find(name).ok_or_else(|| not_found(name))?;
  Ok(Reply::Record(record.clone()))
}

pub fn all_contacts(line: &str, book: &Directory) -> CommandResult {
  args::<0>(Command::All, line)?;
  Ok(Reply::records_or(book.records(), "The address book is empty."))
}

pub fn delete_contact(line: &str, book: &mut Directory) -> CommandResult {
  let [name] = args(Command::Delete, line)?;
  book.delete(name).ok_or_else(|| not_found(name))?;
  Ok(Reply::message(format!("Contact '{name}' deleted.")))
}

pub fn search_name(line: &str, book: &Directory) -> CommandResult {
  let [needle] = args(Command::SearchName, line)?;
  Ok(Reply::records_or(
    book.search_by_partial_name(needle),
    "No contacts match that name.",
  ))
}

pub fn sort_contacts(line: &str, book: &Directory) -> CommandResult {
  let [field] = args(Command::Sort, line)?;
  let sorted = book.sort_contacts(field)?;
  Ok(Reply::records_or(sorted, "No contacts to sort."))
}

// ─── Birthdays ────────────────────────────────────────────────────────────────

pub fn add_birthday(line: &str, book: &mut Directory) -> CommandResult {
  let [name, date] = args(Command::AddBirthday, line)?;
  let record = find_mut(book, name)?;
  record.set_birthday(date)?;
  record.record_change(format!("set birthday {date}"));
  Ok(Reply::message(format!("Birthday added for {name}.")))
}

pub fn show_birthday(line: &str, book: &Directory) -> CommandResult {
  let [name] = args(Command::ShowBirthday, line)?;
  let record = book.find(name).ok_or_else(|| not_found(name))?;
  Ok(Reply::message(match record.birthday() {
    Some(b) => format!("Birthday of {name}: {b}"),
    None => format!("No birthday recorded for {name}."),
  }))
}

pub fn birthdays(line: &str, book: &Directory) -> CommandResult {
  args::<0>(Command::Birthdays, line)?;
  let upcoming = book.get_upcoming_birthdays();
  if upcoming.is_empty() {
    return Ok(Reply::message("No birthdays in the next 7 days."));
  }
  Ok(Reply::Upcoming(upcoming))
}

pub fn notify_birthdays(line: &str, book: &Directory) -> CommandResult {
  args::<0>(Command::NotifyBirthdays, line)?;
  let due = book.check_upcoming_birthdays();
  if due.is_empty() {
    return Ok(Reply::message("No upcoming birthdays."));
  }
  Ok(Reply::Notifications(due))
}

// ─── History ──────────────────────────────────────────────────────────────────

pub fn history(line: &str, book: &Directory) -> CommandResult {
  let [name] = args(Command::History, line)?;
  let record = book.find(name).ok_or_else(|| not_found(name))?;
  if record.change_history().is_empty() {
    return Ok(Reply::message("Change history is empty."));
  }
  Ok(Reply::History(record.change_history().to_vec()))
}

/// Drop the newest history entry of `name`. Field values are not restored.
pub fn revert(line: &str, book: &mut Directory) -> CommandResult {
  let [name] = args(Command::Revert, line)?;
  let record = find_mut(book, name)?;
  Ok(Reply::message(match record.revert_last_change() {
    Some(description) => format!("Reverted to: {description}"),
    None => "Nothing to revert.".to_owned(),
  }))
}

// ─── Groups ───────────────────────────────────────────────────────────────────

pub fn add_group(line: &str, book: &mut Directory) -> CommandResult {
  let [group] = args(Command::AddGroup, line)?;
  Ok(Reply::message(match book.add_group(group) {
    GroupOutcome::Applied => format!("Group '{group}' added."),
    notice => format!("Group '{group}': {notice}."),
  }))
}

pub fn remove_group(line: &str, book: &mut Directory) -> CommandResult {
  let [group] = args(Command::RemoveGroup, line)?;
  Ok(Reply::message(match book.remove_group(group) {
    GroupOutcome::Applied => format!("Group '{group}' removed."),
    notice => format!("Group '{group}': {notice}."),
  }))
}

pub fn add_to_group(line: &str, book: &mut Directory) -> CommandResult {
  let [group, name] = args(Command::AddToGroup, line)?;
  Ok(Reply::message(match book.add_contact_to_group(name, group)? {
    GroupOutcome::Applied => format!("Contact '{name}' added to group '{group}'."),
    notice => format!("Group '{group}': {notice}."),
  }))
}

pub fn remove_from_group(line: &str, book: &mut Directory) -> CommandResult {
  let [group, name] = args(Command::RemoveFromGroup, line)?;
  Ok(Reply::message(match book.remove_contact_from_group(name, group)? {
    GroupOutcome::Applied => format!("Contact '{name}' removed from group '{group}'."),
    notice => format!("Group '{group}': {notice}."),
  }))
}

pub fn groups(line: &str, book: &Directory) -> CommandResult {
  args::<0>(Command::Groups, line)?;
  let views: Vec<GroupView> = book
    .groups()
    .map(|g| {
      let mut view = GroupView { name: g.name.clone(), members: Vec::new(), dangling: Vec::new() };
      for member in book.group_members(&g.name).unwrap_or_default() {
        match member {
          Member::Present(r) => view.members.push(r.name().to_owned()),
          Member::Dangling(n) => view.dangling.push(n.to_owned()),
        }
      }
      view
    })
    .collect();
  if views.is_empty() {
    return Ok(Reply::message("No groups."));
  }
  Ok(Reply::Groups(views))
}

pub fn prune_groups(line: &str, book: &mut Directory) -> CommandResult {
  args::<0>(Command::PruneGroups, line)?;
  let removed = book.prune_dangling_references();
  Ok(Reply::message(format!("Removed {removed} dangling group reference(s).")))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn run(book: &mut Directory, line: &str) -> CommandResult { dispatch(line, book) }

  fn msg(reply: CommandResult) -> String {
    match reply {
      Ok(Reply::Message(m)) => m,
      other => panic!("expected message, got {other:?}"),
    }
  }

  #[test]
  fn command_words_parse_case_insensitively() {
    assert_eq!("add-birthday".parse::<Command>().unwrap(), Command::AddBirthday);
    assert_eq!("HELLO".parse::<Command>().unwrap(), Command::Hello);
    assert_eq!("exit".parse::<Command>().unwrap(), Command::Close);
    assert_eq!(Command::Close.to_string(), "close");
    assert_eq!(Command::RemoveFromGroup.to_string(), "remove-from-group");
  }

  #[test]
  fn add_creates_then_updates() {
    let mut book = Directory::new();
    assert_eq!(msg(run(&mut book, "add Alice 0501234567")), "Contact added.");
    assert_eq!(msg(run(&mut book, "add Alice 0501234567")), "Contact updated.");
    let alice = book.find("Alice").unwrap();
    assert_eq!(alice.phones().len(), 2);
    assert_eq!(alice.change_history().len(), 2);
  }

  #[test]
  fn add_with_bad_phone_creates_nothing() {
    let mut book = Directory::new();
    let err = run(&mut book, "add Alice 12345").unwrap_err();
    assert!(matches!(err, CommandError::Core(Error::InvalidPhone(_))));
    assert!(book.find("Alice").is_none());
  }

  #[test]
  fn argument_counts_are_enforced() {
    let mut book = Directory::new();
    assert!(matches!(
      run(&mut book, "add Alice"),
      Err(CommandError::MissingArgs(Command::Add))
    ));
    assert!(matches!(
      run(&mut book, "add Alice 0501234567 extra"),
      Err(CommandError::TooManyArgs(Command::Add))
    ));
    assert!(matches!(
      run(&mut book, "phone"),
      Err(CommandError::MissingArgs(Command::Phone))
    ));
    assert!(matches!(
      run(&mut book, "all now"),
      Err(CommandError::TooManyArgs(Command::All))
    ));
    assert!(matches!(
      run(&mut book, "change a b c d"),
      Err(CommandError::TooManyArgs(Command::Change))
    ));
  }

  #[test]
  fn unknown_command_is_reported() {
    let mut book = Directory::new();
    assert!(matches!(
      run(&mut book, "frobnicate"),
      Err(CommandError::UnknownCommand(w)) if w == "frobnicate"
    ));
    assert_eq!(msg(run(&mut book, "   ")), "");
  }

  #[test]
  fn change_appends_or_edits() {
    let mut book = Directory::new();
    run(&mut book, "add Bob 0501234567").unwrap();

    run(&mut book, "change Bob 0670000000").unwrap();
    assert_eq!(book.find("Bob").unwrap().phones().len(), 2);

    run(&mut book, "change Bob 0501234567 0931112233").unwrap();
    let bob = book.find("Bob").unwrap();
    assert!(bob.find_phone("0501234567").is_none());
    assert!(bob.find_phone("0931112233").is_some());

    assert!(matches!(
      run(&mut book, "change Bob 0000000000 0931112233"),
      Err(CommandError::Core(Error::PhoneNotFound(_)))
    ));
    assert!(matches!(
      run(&mut book, "change Nobody 0670000000"),
      Err(CommandError::Core(Error::NotFound(_)))
    ));
  }

  #[test]
  fn phone_returns_record_or_not_found() {
    let mut book = Directory::new();
    run(&mut book, "add Alice 0501234567").unwrap();
    match run(&mut book, "phone Alice").unwrap() {
      Reply::Record(r) => assert_eq!(r.name(), "Alice"),
      other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
      run(&mut book, "phone alice"),
      Err(CommandError::Core(Error::NotFound(_)))
    ));
  }

  #[test]
  fn all_on_empty_book_is_a_notice() {
    let mut book = Directory::new();
    assert_eq!(msg(run(&mut book, "all")), "The address book is empty.");
    run(&mut book, "add Alice 0501234567").unwrap();
    assert!(matches!(run(&mut book, "all"), Ok(Reply::Records(r)) if r.len() == 1));
  }

  #[test]
  fn birthday_commands() {
    let mut book = Directory::new();
    run(&mut book, "add Alice 0501234567").unwrap();

    assert_eq!(msg(run(&mut book, "show-birthday Alice")), "No birthday recorded for Alice.");
    assert_eq!(msg(run(&mut book, "add-birthday Alice 20.12.1990")), "Birthday added for Alice.");
    assert_eq!(msg(run(&mut book, "show-birthday Alice")), "Birthday of Alice: 20.12.1990");

    assert!(matches!(
      run(&mut book, "add-birthday Alice 01.01.2000"),
      Err(CommandError::Core(Error::BirthdayAlreadySet(_)))
    ));
    run(&mut book, "add Bob 0670000000").unwrap();
    assert!(matches!(
      run(&mut book, "add-birthday Bob 2000-01-01"),
      Err(CommandError::Core(Error::InvalidDate(_)))
    ));
    assert!(matches!(
      run(&mut book, "add-birthday Ghost 01.01.2000"),
      Err(CommandError::Core(Error::NotFound(_)))
    ));
  }

  #[test]
  fn search_and_sort() {
    let mut book = Directory::new();
    run(&mut book, "add Anna 0990000000").unwrap();
    run(&mut book, "add Hanna 0500000000").unwrap();
    run(&mut book, "add Bob 0670000000").unwrap();

    match run(&mut book, "search-name nna").unwrap() {
      Reply::Records(r) => assert_eq!(r.len(), 2),
      other => panic!("unexpected {other:?}"),
    }
    assert_eq!(msg(run(&mut book, "search-name xyz")), "No contacts match that name.");

    match run(&mut book, "sort phone").unwrap() {
      Reply::Records(r) => {
        let names: Vec<&str> = r.iter().map(Record::name).collect();
        assert_eq!(names, vec!["Hanna", "Bob", "Anna"]);
      }
      other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
      run(&mut book, "sort email"),
      Err(CommandError::Core(Error::UnsupportedSortField(_)))
    ));
  }

  #[test]
  fn history_and_revert() {
    let mut book = Directory::new();
    run(&mut book, "add Alice 0501234567").unwrap();
    assert_eq!(msg(run(&mut book, "revert Alice")), "Nothing to revert.");

    run(&mut book, "add-birthday Alice 20.12.1990").unwrap();
    match run(&mut book, "history Alice").unwrap() {
      Reply::History(h) => assert_eq!(h.len(), 2),
      other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
      msg(run(&mut book, "revert Alice")),
      "Reverted to: created with phone 0501234567"
    );
    // The birthday itself stays.
    assert!(book.find("Alice").unwrap().birthday().is_some());
  }

  #[test]
  fn group_commands() {
    let mut book = Directory::new();
    run(&mut book, "add Alice 0501234567").unwrap();

    assert_eq!(msg(run(&mut book, "add-group friends")), "Group 'friends' added.");
    assert_eq!(
      msg(run(&mut book, "add-group friends")),
      "Group 'friends': a group with that name already exists."
    );
    assert_eq!(
      msg(run(&mut book, "add-to-group friends Alice")),
      "Contact 'Alice' added to group 'friends'."
    );
    assert_eq!(
      msg(run(&mut book, "add-to-group nope Alice")),
      "Group 'nope': no group with that name exists."
    );
    assert!(matches!(
      run(&mut book, "add-to-group friends Ghost"),
      Err(CommandError::Core(Error::NotFound(_)))
    ));

    run(&mut book, "delete Alice").unwrap();
    match run(&mut book, "groups").unwrap() {
      Reply::Groups(g) => {
        assert_eq!(g[0].dangling, vec!["Alice".to_owned()]);
        assert!(g[0].members.is_empty());
      }
      other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
      msg(run(&mut book, "prune-groups")),
      "Removed 1 dangling group reference(s)."
    );
    assert_eq!(msg(run(&mut book, "remove-group friends")), "Group 'friends' removed.");
    assert_eq!(msg(run(&mut book, "groups")), "No groups.");
  }

  #[test]
  fn delete_unknown_contact_leaves_book_unchanged() {
    let mut book = Directory::new();
    run(&mut book, "add Alice 0501234567").unwrap();
    let before = book.clone();
    assert!(matches!(
      run(&mut book, "delete Bob"),
      Err(CommandError::Core(Error::NotFound(_)))
    ));
    assert_eq!(book, before);
  }

  #[test]
  fn close_and_exit_end_the_session() {
    let mut book = Directory::new();
    assert_eq!(run(&mut book, "close").unwrap(), Reply::Exit);
    assert_eq!(run(&mut book, "EXIT").unwrap(), Reply::Exit);
  }
}
