// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registered schemas and templates, and the per-subject view derived from them.

use crate::accesscontrol::{AccessListByVerb, AccessSet, AccessSetLookup};
use crate::error::Result;
use crate::schema::builtin::builtin_schemas;
use crate::schema::cache::SchemaCache;
use crate::schema::template::Template;
use crate::types::{Schema, SchemaSet, UserInfo};
use http::Method;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Default)]
struct State {
    schemas: BTreeMap<String, Schema>,
    templates: HashMap<String, Arc<Template>>,
}

pub struct Collection {
    lookup: Arc<dyn AccessSetLookup>,
    cache: Arc<SchemaCache>,
    base_schemas: SchemaSet,
    state: RwLock<State>,
}

impl Collection {
    /// `base_schemas` are added to every subject's set without filtering.
    pub fn new(
        lookup: Arc<dyn AccessSetLookup>,
        cache: Arc<SchemaCache>,
        base_schemas: SchemaSet,
    ) -> Self {
        Self {
            lookup,
            cache,
            base_schemas,
            state: RwLock::new(State::default()),
        }
    }

    pub fn add_template(&self, template: Template) {
        let key = template.key();
        debug!("Registering template {:?}", key);
        self.state.write().templates.insert(key, Arc::new(template));
    }

    /// Replace the registered schemas. Templates are applied to each schema first.
    pub fn reset(&self, schemas: Vec<Schema>) {
        let mut templated = BTreeMap::new();
        for mut schema in schemas {
            self.apply_templates(&mut schema);
            templated.insert(schema.id.clone(), schema);
        }

        info!("Registered {} schemas", templated.len());
        self.state.write().schemas = templated;
    }

    /// A registered (unfiltered) schema.
    pub fn schema(&self, id: &str) -> Option<Schema> {
        self.state.read().schemas.get(id).cloned()
    }

    /// The schemas visible to `user`, cached per access set.
    #[instrument(skip(self, user), fields(user = %user.name))]
    pub fn schemas(&self, user: &UserInfo) -> Result<Arc<SchemaSet>> {
        let access = self.lookup.access_for(user);
        let key = access.id();
        if let Some(schemas) = self.cache.get(&key) {
            debug!("Schema cache hit for access set {}", key);
            return Ok(schemas);
        }

        debug!("Schema cache miss for access set {}", key);
        let schemas = Arc::new(self.schemas_for_subject(&access)?);
        Ok(self.cache.get_or_insert(key, schemas))
    }

    /// Filter the registered schemas down to what `access` grants.
    ///
    /// Schemas without a backing resource type are always included. Resource
    /// schemas with no granted verb are left out; the others are copied and
    /// get the granted verbs and the matching HTTP methods attached. Any
    /// failure to add a schema fails the whole computation.
    pub fn schemas_for_subject(&self, access: &AccessSet) -> Result<SchemaSet> {
        let state = self.state.read();

        let mut result = SchemaSet::new();
        for schema in builtin_schemas() {
            result.add_schema(schema)?;
        }
        result.add_schemas(&self.base_schemas)?;

        for schema in state.schemas.values() {
            let Some(gr) = schema.group_resource() else {
                result.add_schema(schema.clone())?;
                continue;
            };

            let mut verb_access = AccessListByVerb::new();
            for verb in &schema.attributes.verbs {
                let list = access.access_list_for(verb, &gr);
                if !list.is_empty() {
                    verb_access.insert(verb.clone(), list);
                }
            }

            if verb_access.is_empty() {
                continue;
            }

            let mut schema = schema.clone();
            add_methods(&mut schema, &verb_access);
            schema.attributes.access = Some(verb_access);
            result.add_schema(schema)?;
        }

        Ok(result)
    }

    /// Fill in formatter and store from the matching templates, in order:
    /// exact ID, `group/kind`, global default. The first template providing a
    /// formatter or store wins; every matching template's customize hook runs.
    pub fn apply_templates(&self, schema: &mut Schema) {
        let templates = {
            let state = self.state.read();
            [
                state.templates.get(&schema.id).cloned(),
                state.templates.get(&schema.group_kind()).cloned(),
                state.templates.get("").cloned(),
            ]
        };
        let default_store = templates[2].as_ref().and_then(|t| t.store.clone());

        for template in templates.iter().flatten() {
            if schema.formatter.is_none() {
                schema.formatter = template.formatter.clone();
            }
            if schema.store.is_none() {
                schema.store = match &template.store_factory {
                    Some(factory) => Some(factory(default_store.clone())),
                    None => template.store.clone(),
                };
            }
            if let Some(customize) = &template.customize {
                customize(&mut *schema);
            }
        }
    }
}

fn add_methods(schema: &mut Schema, access: &AccessListByVerb) {
    if access.any_verb(&["list", "get"]) {
        schema.resource_methods.push(Method::GET.to_string());
        schema.collection_methods.push(Method::GET.to_string());
    }
    if access.any_verb(&["delete"]) {
        schema.resource_methods.push(Method::DELETE.to_string());
    }
    if access.any_verb(&["update"]) {
        schema.resource_methods.push(Method::PUT.to_string());
        schema.resource_methods.push(Method::PATCH.to_string());
    }
    if access.any_verb(&["create"]) {
        schema.collection_methods.push(Method::POST.to_string());
    }
}
