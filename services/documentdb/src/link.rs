//! Resource link parsing.
//!
//! A resource link addresses a resource either by self-link, built from the
//! opaque resource ids the service assigns (`/dbs/b5NCAA==/colls/b5NCAJuVNXs=/`),
//! or by named link, built from the ids users picked
//! (`/dbs/mydb/colls/mycoll/`). Requests are signed over the resource type and
//! the resource id derived from the link, and both schemes derive them
//! differently.

/// The resource type and resource id a request is signed for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceLink {
    resource_id: String,
    resource_type: String,
}

impl ResourceLink {
    /// Parse a resource link.
    ///
    /// Parsing never fails. Feed links such as `/dbs/` or `dbs` yield an
    /// empty resource id; the empty link yields an empty id and type.
    ///
    /// # Self-link detection
    ///
    /// A link is a self-link when it has more than one segment and its second
    /// segment is exactly 8 bytes long and ends with `==`: a 6 byte resource
    /// id in padded base64. `=` is not allowed in user chosen ids, so named
    /// links never match. This is a fixed rule of the protocol, not a
    /// general grammar.
    pub fn parse(link: &str) -> Self {
        let link = link.trim_start_matches('/').trim_end_matches('/');
        if link.is_empty() {
            return Self::default();
        }

        // Keep the empty strings around the boundary slashes so that `parts`
        // lines up with the protocol's indexing: `/dbs/x/` => ["", "dbs", "x", ""].
        let parts: Vec<&str> = std::iter::once("")
            .chain(link.split('/'))
            .chain(std::iter::once(""))
            .collect();
        let l = parts.len();
        let even = l % 2 == 0;

        let resource_type = if even { parts[l - 3] } else { parts[l - 2] };

        let resource_id = if is_self_link(&parts) {
            if even {
                parts[l - 2].to_string()
            } else {
                parts[l - 3].to_string()
            }
        } else {
            let end = if even { l - 1 } else { l - 2 };
            parts[1..end].join("/")
        };

        Self {
            resource_id,
            resource_type: resource_type.to_string(),
        }
    }

    /// Build the link of a child feed, for example the `colls` feed of a
    /// database: `join("/dbs/mydb", "colls")` gives `/dbs/mydb/colls/`.
    pub fn join(parent: &str, child: &str) -> String {
        let parent = parent.trim_matches('/');
        let child = child.trim_matches('/');

        let mut s = String::with_capacity(parent.len() + child.len() + 3);
        s.push('/');
        if !parent.is_empty() {
            s.push_str(parent);
            s.push('/');
        }
        s.push_str(child);
        s.push('/');
        s
    }

    /// The resource id the request is signed for.
    ///
    /// For self-links this is the opaque id of the addressed resource, for
    /// named links the full id path such as `dbs/mydb/colls/mycoll`.
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// The resource type the request is signed for, such as `dbs` or `docs`.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }
}

fn is_self_link(parts: &[&str]) -> bool {
    parts.len() > 3 && parts[2].len() == 8 && parts[2].ends_with("==")
}
