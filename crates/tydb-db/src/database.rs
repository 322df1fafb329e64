use std::borrow::Cow;

use serde_json::Value;
use tydb_item::{Item, ItemError, ItemResult};
use tydb_schema::Schema;
use tydb_types::Type;

use crate::error::DbResult;
use crate::selector::{Selector, Step};

/// A single typed document tree.
///
/// The root item is the zero value of the schema's root type and lives as
/// long as the database. Every mutation is applied to the live tree
/// immediately.
#[derive(Clone, Debug)]
pub struct Database {
    root_type: Type,
    root: Item,
}

impl Database {
    /// Create a database from a validated schema.
    pub fn new(schema: &Schema) -> DbResult<Self> {
        Ok(Self::from_type(schema.root_type()?))
    }

    /// Create a database whose root is the zero value of `root_type`.
    pub fn from_type(root_type: Type) -> Self {
        let root = Item::zero(&root_type);
        tracing::debug!(root_type = %root_type, "database initialised");
        Self { root_type, root }
    }

    pub fn root_type(&self) -> &Type {
        &self.root_type
    }

    pub fn root(&self) -> &Item {
        &self.root
    }

    /// Walk `selector` from the root.
    ///
    /// Field and key steps borrow into the tree; a filter step produces a
    /// detached item, and any step after it borrows from (or copies out of)
    /// that result. The first failing step ends the walk with its error.
    pub fn resolve(&self, selector: &Selector) -> ItemResult<Cow<'_, Item>> {
        let mut current = Cow::Borrowed(&self.root);
        for step in selector.steps() {
            current = match current {
                Cow::Borrowed(item) => apply(item, step)?,
                Cow::Owned(item) => Cow::Owned(apply(&item, step)?.into_owned()),
            };
        }
        Ok(current)
    }

    /// Walk `selector` from the root to a live, mutable sub-item.
    ///
    /// A filter step followed by a field or key step acts as a guard: the
    /// entry must satisfy the filter, otherwise the step fails with
    /// `Index`. A selector ending on a filter names a detached result, which
    /// cannot be assigned and is declined.
    pub fn resolve_mut(&mut self, selector: &Selector) -> ItemResult<&mut Item> {
        let mut current = &mut self.root;
        let mut view: Option<Item> = None;
        for step in selector.steps() {
            match step {
                Step::Filter(filter) => {
                    let base = view.as_ref().unwrap_or(&*current);
                    let filtered = base.filter(&filter.field, filter.op, &filter.value.to_item())?;
                    view = Some(filtered);
                }
                Step::Field(name) => {
                    if let Some(view) = view.take() {
                        view.get_field(name)?;
                    }
                    current = current.get_field_mut(name)?;
                }
                Step::Key(literal) => {
                    let key = literal.to_item();
                    if let Some(view) = view.take() {
                        view.get_key(&key)?;
                    }
                    current = current.get_key_mut(&key)?;
                }
            }
        }
        if view.is_some() {
            return Err(ItemError::Declined(format!(
                "selector {selector} ends on a filter, whose result is detached from the database"
            )));
        }
        Ok(current)
    }

    /// Parse and resolve a selector string.
    pub fn query_string(&self, selector: &str) -> DbResult<Cow<'_, Item>> {
        let selector: Selector = selector.parse()?;
        let item = self.resolve(&selector).inspect_err(|e| {
            tracing::debug!(%selector, status = %e.status(), error = %e, "selector did not resolve");
        })?;
        Ok(item)
    }

    /// Resolve `selector` and assign the untyped `value` to the target.
    ///
    /// Returns the updated item. A failed assignment leaves the tree as it
    /// was.
    pub fn set(&mut self, selector: &str, value: &Value) -> DbResult<&Item> {
        let selector: Selector = selector.parse()?;
        let target = self.resolve_mut(&selector)?;
        target.assign(value)?;
        tracing::debug!(%selector, "assigned");
        Ok(&*target)
    }
}

fn apply<'a>(item: &'a Item, step: &Step) -> ItemResult<Cow<'a, Item>> {
    match step {
        Step::Field(name) => item.get_field(name).map(Cow::Borrowed),
        Step::Key(literal) => item.get_key(&literal.to_item()).map(Cow::Borrowed),
        Step::Filter(filter) => item
            .filter(&filter.field, filter.op, &filter.value.to_item())
            .map(Cow::Owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use serde_json::json;
    use tydb_item::Status;

    fn users_schema() -> Schema {
        Schema::new("{users: hashmap<string, User>}")
            .with_type("User", "{name: string, age: number}")
    }

    fn populated() -> Database {
        let mut db = Database::new(&users_schema()).unwrap();
        db.set(
            "users",
            &json!({
                "alice": {"name": "Alice", "age": 30},
                "bob": {"name": "Bob", "age": 17},
            }),
        )
        .unwrap();
        db
    }

    fn status_of(result: DbResult<Cow<'_, Item>>) -> Option<Status> {
        result.err().and_then(|e| e.status())
    }

    // -----------------------------------------------------------------------
    // Initialisation
    // -----------------------------------------------------------------------

    #[test]
    fn new_database_holds_zero_root() {
        let db = Database::new(&users_schema()).unwrap();
        assert_eq!(db.root().render_json(), r#"{"users":{}}"#);
        assert_eq!(db.root().ty(), *db.root_type());
    }

    #[test]
    fn invalid_schema_is_rejected() {
        let err = Database::new(&Schema::new("hashmap<string, Nope>")).unwrap_err();
        assert!(matches!(err, DbError::Schema(_)));
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_field_path() {
        let db = populated();
        let name = db.query_string("users.alice.name").unwrap();
        assert_eq!(*name, Item::from("Alice"));
        assert!(matches!(name, Cow::Borrowed(_)));
    }

    #[test]
    fn missing_entry_is_index() {
        let db = populated();
        assert_eq!(status_of(db.query_string("users.carol.name")), Some(Status::Index));
        assert_eq!(status_of(db.query_string("users.alice.email")), Some(Status::Index));
    }

    #[test]
    fn empty_selector_is_root() {
        let db = populated();
        assert_eq!(*db.query_string("").unwrap(), *db.root());
    }

    #[test]
    fn key_steps() {
        let db = populated();
        assert_eq!(
            *db.query_string(r#"users["bob"].age"#).unwrap(),
            Item::from(17.0)
        );
        assert_eq!(status_of(db.query_string("users[1]")), Some(Status::Type));
    }

    #[test]
    fn array_elements_by_index() {
        let mut db = Database::from_type(Type::array(Type::Number));
        db.set("", &json!([10, 20])).unwrap();
        assert_eq!(*db.query_string("[1]").unwrap(), Item::from(20.0));
        assert_eq!(status_of(db.query_string("[2]")), Some(Status::Index));

        db.set("[0]", &json!(11)).unwrap();
        assert_eq!(db.root().render_json(), "[11,20]");
    }

    #[test]
    fn non_string_keys_by_literal() {
        let mut db = Database::from_type(Type::hashmap(Type::Boolean, Type::String));
        db.resolve_mut(&Selector::root())
            .unwrap()
            .set_key(true.into(), "yes".into())
            .unwrap();
        assert_eq!(*db.query_string("[true]").unwrap(), Item::from("yes"));
        assert_eq!(status_of(db.query_string("[false]")), Some(Status::Index));
    }

    #[test]
    fn signed_zero_filters_consistently() {
        let mut db = populated();
        db.set("users.bob.age", &json!(-0.0)).unwrap();
        let zero = db.query_string("users[age == 0]").unwrap();
        assert!(zero.get_field("bob").is_ok());
        let below = db.query_string("users[age < 0]").unwrap();
        assert!(below.get_field("bob").is_err());
    }

    #[test]
    fn filter_then_continue() {
        let db = populated();
        let adults = db.query_string("users[age >= 18]").unwrap();
        assert!(matches!(adults, Cow::Owned(_)));
        assert_eq!(adults.render_json(), r#"{"alice":{"age":30,"name":"Alice"}}"#);

        let name = db.query_string("users[age >= 18].alice.name").unwrap();
        assert_eq!(*name, Item::from("Alice"));
        assert_eq!(
            status_of(db.query_string("users[age >= 18].bob")),
            Some(Status::Index)
        );
    }

    #[test]
    fn failing_filter_reports_its_status() {
        let db = populated();
        assert_eq!(
            status_of(db.query_string(r#"users[age > "x"]"#)),
            Some(Status::Type)
        );
        assert_eq!(status_of(db.query_string("users.alice[> 1]")), Some(Status::Type));
    }

    #[test]
    fn scalar_steps_are_type_errors() {
        let db = populated();
        assert_eq!(
            status_of(db.query_string("users.alice.age.digits")),
            Some(Status::Type)
        );
    }

    #[test]
    fn malformed_selector_has_no_status() {
        let db = populated();
        let err = db.query_string("users[").unwrap_err();
        assert!(matches!(err, DbError::Selector(_)));
        assert_eq!(err.status(), None);
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    #[test]
    fn set_is_visible_to_later_reads() {
        let mut db = populated();
        let updated = db.set("users.alice.age", &json!(31)).unwrap();
        assert_eq!(updated.render_json(), "31");
        assert_eq!(*db.query_string("users.alice.age").unwrap(), Item::from(31.0));
    }

    #[test]
    fn failed_set_changes_nothing() {
        let mut db = populated();
        let before = db.root().clone();

        let err = db.set("users.alice.age", &json!("old")).unwrap_err();
        assert_eq!(err.status(), Some(Status::Type));
        let err = db
            .set("users", &json!({"carol": {"name": "Carol", "age": "?"}}))
            .unwrap_err();
        assert_eq!(err.status(), Some(Status::Type));

        assert_eq!(*db.root(), before);
    }

    #[test]
    fn set_through_filter_guard() {
        let mut db = populated();
        db.set("users[age >= 18].alice.age", &json!(40)).unwrap();
        assert_eq!(*db.query_string("users.alice.age").unwrap(), Item::from(40.0));

        let err = db.set("users[age >= 18].bob.age", &json!(40)).unwrap_err();
        assert_eq!(err.status(), Some(Status::Index));
        assert_eq!(*db.query_string("users.bob.age").unwrap(), Item::from(17.0));
    }

    #[test]
    fn set_on_filter_result_is_declined() {
        let mut db = populated();
        let before = db.root().clone();
        let err = db.set("users[age >= 18]", &json!({})).unwrap_err();
        assert_eq!(err.status(), Some(Status::Noop));
        assert_eq!(*db.root(), before);
    }

    #[test]
    fn set_on_non_string_keyed_hashmap_is_declined() {
        let mut db = Database::from_type(Type::hashmap(Type::Number, Type::String));
        let err = db.set("", &json!({"1": "one"})).unwrap_err();
        assert_eq!(err.status(), Some(Status::Noop));
    }

    #[test]
    fn set_root_scalar() {
        let mut db = Database::from_type(Type::Boolean);
        assert_eq!(db.set("", &json!(true)).unwrap(), &Item::from(true));
    }

    #[test]
    fn resolve_mut_allows_typed_set_key() {
        let mut db = populated();
        let users = db.resolve_mut(&"users".parse().unwrap()).unwrap();
        let mut dave = Item::zero(&users_schema().resolve_named("User").unwrap());
        dave.set_field("name", "Dave".into()).unwrap();
        users.set_field("dave", dave).unwrap();
        assert_eq!(
            *db.query_string("users.dave.name").unwrap(),
            Item::from("Dave")
        );
    }
}
