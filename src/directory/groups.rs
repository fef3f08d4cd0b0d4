//! Authorization Extension group, nesting, and membership operations.

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	client::Client,
	directory::{User, required, segment},
	http::HttpTransport,
};

/// Authorization Extension group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
	/// Group identifier assigned by the extension.
	#[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Group name.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub name: String,
	/// Free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Direct member user identifiers.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub members: Vec<String>,
}

/// Direct members of a group.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Members {
	/// Member users.
	#[serde(default)]
	pub users: Vec<User>,
	/// Total number of members.
	#[serde(default)]
	pub total: u64,
}

/// Member reached through a nested group.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NestedMember {
	/// Member user.
	pub user: User,
	/// Group the membership comes from.
	pub group: Group,
}

/// Members of a group including those of its nested groups.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NestedMembers {
	/// Nested memberships.
	#[serde(default)]
	pub nested: Vec<NestedMember>,
	/// Total number of nested memberships.
	#[serde(default)]
	pub total: u64,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a group (`POST groups`).
	pub async fn create_group(
		&self,
		name: impl Into<String>,
		description: impl Into<String>,
	) -> Result<Group> {
		const PATH: &str = "groups";

		let group = Group {
			name: name.into(),
			description: Some(description.into()),
			..Default::default()
		};

		required(self.authorization_extension().post(PATH, &group).await?, PATH)
	}

	/// Fetches a group (`GET groups/{id}`).
	pub async fn get_group(&self, group_id: &str) -> Result<Group> {
		let path = group_path(group_id, "");

		required(self.authorization_extension().get(&path).await?, &path)
	}

	/// Deletes a group (`DELETE groups/{id}`).
	pub async fn delete_group(&self, group_id: &str) -> Result<()> {
		let path = group_path(group_id, "");

		self.authorization_extension().delete::<(), IgnoredAny>(&path, None).await?;

		Ok(())
	}

	/// Nests groups under a parent (`PATCH groups/{id}/nested`).
	pub async fn nest_groups<I, S>(&self, group_id: &str, nested_ids: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let ids = collect_ids(nested_ids);

		self.authorization_extension()
			.patch::<_, IgnoredAny>(&group_path(group_id, "nested"), &ids)
			.await?;

		Ok(())
	}

	/// Lists the groups nested under a parent (`GET groups/{id}/nested`).
	pub async fn get_nested_groups(&self, group_id: &str) -> Result<Vec<Group>> {
		let path = group_path(group_id, "nested");

		required(self.authorization_extension().get(&path).await?, &path)
	}

	/// Adds users to a group (`PATCH groups/{id}/members`).
	pub async fn add_group_members<I, S>(&self, group_id: &str, user_ids: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let ids = collect_ids(user_ids);

		self.authorization_extension()
			.patch::<_, IgnoredAny>(&group_path(group_id, "members"), &ids)
			.await?;

		Ok(())
	}

	/// Lists the direct members of a group (`GET groups/{id}/members`).
	pub async fn get_group_members(&self, group_id: &str) -> Result<Members> {
		let path = group_path(group_id, "members");

		required(self.authorization_extension().get(&path).await?, &path)
	}

	/// Finds one direct member of a group.
	pub async fn get_group_member(&self, group_id: &str, user_id: &str) -> Result<Option<User>> {
		let members = self.get_group_members(group_id).await?;

		Ok(members.users.into_iter().find(|user| user.user_id.as_deref() == Some(user_id)))
	}

	/// Lists members including those of nested groups (`GET groups/{id}/members/nested`).
	pub async fn get_nested_group_members(&self, group_id: &str) -> Result<NestedMembers> {
		let path = group_path(group_id, "members/nested");

		required(self.authorization_extension().get(&path).await?, &path)
	}

	/// Finds one member of a group or of its nested groups.
	pub async fn get_nested_group_member(
		&self,
		group_id: &str,
		user_id: &str,
	) -> Result<Option<NestedMember>> {
		let members = self.get_nested_group_members(group_id).await?;

		Ok(members.nested.into_iter().find(|member| member.user.user_id.as_deref() == Some(user_id)))
	}

	/// Removes users from a group (`DELETE groups/{id}/members` with a JSON body).
	pub async fn delete_group_members<I, S>(&self, group_id: &str, user_ids: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let ids = collect_ids(user_ids);

		self.authorization_extension()
			.delete::<_, IgnoredAny>(&group_path(group_id, "members"), Some(&ids))
			.await?;

		Ok(())
	}

	/// Lists the groups a user belongs to (`GET users/{id}/groups`).
	pub async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>> {
		let path = format!("users/{}/groups", segment(user_id));

		required(self.authorization_extension().get(&path).await?, &path)
	}
}

fn group_path(group_id: &str, suffix: &str) -> String {
	if suffix.is_empty() {
		format!("groups/{}", segment(group_id))
	} else {
		format!("groups/{}/{suffix}", segment(group_id))
	}
}

fn collect_ids<I, S>(ids: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	ids.into_iter().map(Into::into).collect()
}
