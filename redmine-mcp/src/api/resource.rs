//! Catalogue of tracker resources
//!
//! Each [`Resource`] records the envelope keys the tracker uses for the
//! resource and the path templates of its collection and member endpoints.

/// Wire description of one tracker resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Envelope key of a single entity, e.g. `issue`
    pub singular: &'static str,
    /// Envelope key of a list, e.g. `issues`
    pub plural: &'static str,
    /// Template of the collection endpoint
    pub collection: Option<&'static str>,
    /// Template of the member endpoint
    pub member: Option<&'static str>,
}

impl Resource {
    /// Words used in operation labels, e.g. `issue category`
    pub fn label(&self) -> String {
        self.singular.replace('_', " ")
    }
}

/// Issues
pub const ISSUES: Resource = Resource {
    singular: "issue",
    plural: "issues",
    collection: Some("/issues.json"),
    member: Some("/issues/{id}.json"),
};

/// Projects
pub const PROJECTS: Resource = Resource {
    singular: "project",
    plural: "projects",
    collection: Some("/projects.json"),
    member: Some("/projects/{id}.json"),
};

/// Users
pub const USERS: Resource = Resource {
    singular: "user",
    plural: "users",
    collection: Some("/users.json"),
    member: Some("/users/{id}.json"),
};

/// Groups
pub const GROUPS: Resource = Resource {
    singular: "group",
    plural: "groups",
    collection: Some("/groups.json"),
    member: Some("/groups/{id}.json"),
};

/// Project memberships
pub const MEMBERSHIPS: Resource = Resource {
    singular: "membership",
    plural: "memberships",
    collection: Some("/projects/{project_id}/memberships.json"),
    member: Some("/memberships/{id}.json"),
};

/// Project versions
pub const VERSIONS: Resource = Resource {
    singular: "version",
    plural: "versions",
    collection: Some("/projects/{project_id}/versions.json"),
    member: Some("/versions/{id}.json"),
};

/// Issue categories of a project
pub const ISSUE_CATEGORIES: Resource = Resource {
    singular: "issue_category",
    plural: "issue_categories",
    collection: Some("/projects/{project_id}/issue_categories.json"),
    member: Some("/issue_categories/{id}.json"),
};

/// Relations between issues
pub const ISSUE_RELATIONS: Resource = Resource {
    singular: "relation",
    plural: "relations",
    collection: Some("/issues/{issue_id}/relations.json"),
    member: Some("/relations/{id}.json"),
};

/// Time entries
pub const TIME_ENTRIES: Resource = Resource {
    singular: "time_entry",
    plural: "time_entries",
    collection: Some("/time_entries.json"),
    member: Some("/time_entries/{id}.json"),
};

/// Wiki pages of a project
pub const WIKI_PAGES: Resource = Resource {
    singular: "wiki_page",
    plural: "wiki_pages",
    collection: Some("/projects/{project_id}/wiki/index.json"),
    member: Some("/projects/{project_id}/wiki/{title}.json"),
};

/// Roles
pub const ROLES: Resource = Resource {
    singular: "role",
    plural: "roles",
    collection: Some("/roles.json"),
    member: Some("/roles/{id}.json"),
};

/// Trackers
pub const TRACKERS: Resource = Resource {
    singular: "tracker",
    plural: "trackers",
    collection: Some("/trackers.json"),
    member: None,
};

/// Issue statuses
pub const ISSUE_STATUSES: Resource = Resource {
    singular: "issue_status",
    plural: "issue_statuses",
    collection: Some("/issue_statuses.json"),
    member: None,
};

/// Custom field definitions
pub const CUSTOM_FIELDS: Resource = Resource {
    singular: "custom_field",
    plural: "custom_fields",
    collection: Some("/custom_fields.json"),
    member: None,
};

/// Saved queries
pub const QUERIES: Resource = Resource {
    singular: "query",
    plural: "queries",
    collection: Some("/queries.json"),
    member: None,
};

/// Files of a project
pub const FILES: Resource = Resource {
    singular: "file",
    plural: "files",
    collection: Some("/projects/{project_id}/files.json"),
    member: None,
};

/// Attachments
pub const ATTACHMENTS: Resource = Resource {
    singular: "attachment",
    plural: "attachments",
    collection: None,
    member: Some("/attachments/{id}.json"),
};

/// Uploaded file content awaiting attachment
pub const UPLOADS: Resource = Resource {
    singular: "upload",
    plural: "uploads",
    collection: Some("/uploads.json"),
    member: None,
};

/// Issue priority enumeration
pub const ISSUE_PRIORITIES: Resource = Resource {
    singular: "issue_priority",
    plural: "issue_priorities",
    collection: Some("/enumerations/issue_priorities.json"),
    member: None,
};

/// Time entry activity enumeration
pub const TIME_ENTRY_ACTIVITIES: Resource = Resource {
    singular: "time_entry_activity",
    plural: "time_entry_activities",
    collection: Some("/enumerations/time_entry_activities.json"),
    member: None,
};

/// Document category enumeration
pub const DOCUMENT_CATEGORIES: Resource = Resource {
    singular: "document_category",
    plural: "document_categories",
    collection: Some("/enumerations/document_categories.json"),
    member: None,
};
