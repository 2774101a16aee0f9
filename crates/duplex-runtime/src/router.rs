//! Client-side routing.
//!
//! A router renders the markup of the best matching route into a container
//! element. Routes are ranked by [`RoutePattern::score`]; ties go to the
//! route registered first.
//!
//! ```
//! use std::rc::Rc;
//! use duplex_runtime::{Document, MemoryDocument, NavigationOutcome, Route, RouterConfig, Runtime};
//!
//! let document = Rc::new(MemoryDocument::new());
//! document.insert_element("app", "");
//! let runtime = Runtime::new(document.clone());
//!
//! let router = runtime.create_router(
//! 	RouterConfig::default(),
//! 	vec![
//! 		Route::new("/", |_| "<h1>Home</h1>".to_string()),
//! 		Route::new("/users/:id", |params| format!("<h1>User {}</h1>", params["id"])),
//! 	],
//! );
//!
//! let outcome = router.navigate("/users/42").unwrap();
//! assert!(matches!(outcome, NavigationOutcome::Rendered(_)));
//! assert_eq!(document.inner_html("app").as_deref(), Some("<h1>User 42</h1>"));
//! ```

mod pattern;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

pub use pattern::{RouteParams, RoutePattern, WILDCARD_PARAM};

use crate::error::RuntimeError;
use crate::runtime::{Runtime, RuntimeInner};
use crate::{debug_log, error_log, warn_log};

type RenderRoute = Rc<dyn Fn(&RouteParams) -> String>;

/// A pattern and the markup it renders.
#[derive(Clone)]
pub struct Route {
	pattern: RoutePattern,
	render: RenderRoute,
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("pattern", &self.pattern.as_str())
			.finish()
	}
}

impl Route {
	pub fn new<F>(pattern: &str, render: F) -> Self
	where
		F: Fn(&RouteParams) -> String + 'static,
	{
		Self {
			pattern: RoutePattern::parse(pattern),
			render: Rc::new(render),
		}
	}

	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	pub fn render(&self, params: &RouteParams) -> String {
		(self.render)(params)
	}
}

/// Router settings.
///
/// ```
/// use duplex_runtime::RouterConfig;
///
/// let config = RouterConfig::new("docs").container_id("content").cache(true);
/// assert_eq!(config.id, "docs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// Router instance id.
	pub id: String,
	/// Element the routes render into.
	pub container_id: String,
	/// Keep components under the container alive across navigations and
	/// memoize route matches per path.
	pub cache: bool,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			id: "main".to_string(),
			container_id: "app".to_string(),
			cache: false,
		}
	}
}

impl RouterConfig {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}

	pub fn container_id(mut self, container_id: impl Into<String>) -> Self {
		self.container_id = container_id.into();
		self
	}

	pub fn cache(mut self, cache: bool) -> Self {
		self.cache = cache;
		self
	}
}

/// Navigation state of a router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouterContext {
	pub current_path: Option<String>,
	pub previous_path: Option<String>,
	pub params: RouteParams,
	pub cache: bool,
}

/// The route selected for a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
	/// Position of the route in registration order.
	pub index: usize,
	pub pattern: String,
	pub params: RouteParams,
	pub score: usize,
}

/// What [`Runtime::navigate`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The container now shows the matched route.
	Rendered(RouteMatch),
	/// The route rendered the markup already in the container.
	Unchanged(RouteMatch),
	/// No route matches; the container was left alone.
	NotFound,
	/// The container element does not exist.
	MissingContainer,
}

/// A route table bound to a container.
pub struct Router {
	config: RouterConfig,
	routes: Vec<Route>,
	context: RouterContext,
	match_cache: RefCell<HashMap<String, Option<RouteMatch>>>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("config", &self.config)
			.field("routes", &self.routes)
			.field("context", &self.context)
			.finish()
	}
}

impl Router {
	pub fn new(config: RouterConfig, routes: Vec<Route>) -> Self {
		let context = RouterContext {
			cache: config.cache,
			..RouterContext::default()
		};
		Self {
			config,
			routes,
			context,
			match_cache: RefCell::new(HashMap::new()),
		}
	}

	pub fn config(&self) -> &RouterConfig {
		&self.config
	}

	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	pub fn context(&self) -> &RouterContext {
		&self.context
	}

	/// The highest scoring route matching `path`.
	pub fn match_route(&self, path: &str) -> Option<RouteMatch> {
		if self.config.cache
			&& let Some(cached) = self.match_cache.borrow().get(path)
		{
			return cached.clone();
		}

		let mut best: Option<RouteMatch> = None;
		for (index, route) in self.routes.iter().enumerate() {
			let Some(params) = route.pattern.matches(path) else {
				continue;
			};
			let score = route.pattern.score();
			if best.as_ref().is_none_or(|current| score > current.score) {
				best = Some(RouteMatch {
					index,
					pattern: route.pattern.as_str().to_string(),
					params,
					score,
				});
			}
		}

		if self.config.cache {
			self.match_cache
				.borrow_mut()
				.insert(path.to_string(), best.clone());
		}
		best
	}

	/// Builds a path from the first route whose pattern is `pattern`.
	pub fn reverse(&self, pattern: &str, params: &RouteParams) -> Option<String> {
		self.routes
			.iter()
			.find(|route| route.pattern.as_str() == pattern)
			.and_then(|route| route.pattern.reverse(params))
	}
}

impl Runtime {
	/// Registers a router, replacing any router with the same id.
	pub fn create_router(&self, config: RouterConfig, routes: Vec<Route>) -> RouterHandle {
		let id = config.id.clone();
		debug_log!("router `{}` created with {} routes", id, routes.len());
		self.inner
			.routers
			.borrow_mut()
			.insert(id.clone(), Router::new(config, routes));
		RouterHandle {
			runtime: self.downgrade(),
			id,
		}
	}

	pub fn remove_router(&self, router_id: &str) -> bool {
		self.inner.routers.borrow_mut().remove(router_id).is_some()
	}

	pub fn router_context(&self, router_id: &str) -> Option<RouterContext> {
		self.inner
			.routers
			.borrow()
			.get(router_id)
			.map(|router| router.context.clone())
	}

	/// Navigates `router_id` to `path`.
	///
	/// The history entry is pushed and the route rendered. When the markup
	/// differs from the container's content, components mounted under the
	/// container are torn down (unless the router caches), the content is
	/// swapped and its scripts run again.
	pub fn navigate(&self, router_id: &str, path: &str) -> Result<NavigationOutcome, RuntimeError> {
		let (container_id, cache, matched) = {
			let routers = self.inner.routers.borrow();
			let router = routers
				.get(router_id)
				.ok_or_else(|| RuntimeError::UnknownRouter { id: router_id.to_string() })?;
			let matched = router
				.match_route(path)
				.map(|route_match| (Rc::clone(&router.routes[route_match.index].render), route_match));
			(router.config.container_id.clone(), router.config.cache, matched)
		};

		let document = self.document();
		if !document.has_element(&container_id) {
			error_log!("router `{}`: container `{}` not found", router_id, container_id);
			return Ok(NavigationOutcome::MissingContainer);
		}
		let Some((render, route_match)) = matched else {
			warn_log!("router `{}`: no route matches {}", router_id, path);
			return Ok(NavigationOutcome::NotFound);
		};

		document.push_history(path);
		let html = render(&route_match.params);

		if let Some(router) = self.inner.routers.borrow_mut().get_mut(router_id) {
			let context = &mut router.context;
			context.previous_path = context.current_path.replace(path.to_string());
			context.params = route_match.params.clone();
		}

		if document.inner_html(&container_id).as_deref() == Some(html.as_str()) {
			return Ok(NavigationOutcome::Unchanged(route_match));
		}
		if !cache {
			self.purge_container(&container_id);
		}
		document.set_inner_html(&container_id, &html);
		document.reexecute_scripts(&container_id);
		debug_log!("router `{}` rendered {} for {}", router_id, route_match.pattern, path);
		Ok(NavigationOutcome::Rendered(route_match))
	}

	/// Builds a path from one of `router_id`'s patterns.
	pub fn reverse(&self, router_id: &str, pattern: &str, params: &RouteParams) -> Option<String> {
		self.inner
			.routers
			.borrow()
			.get(router_id)
			.and_then(|router| router.reverse(pattern, params))
	}

	/// Tears down every component rendered under `container_id`.
	fn purge_container(&self, container_id: &str) {
		for id in self.document().descendant_ids(container_id) {
			self.unmount_element(&id);
			self.cleanup_component(&id);
		}
	}
}

/// Handle to a router registered with [`Runtime::create_router`].
#[derive(Clone)]
pub struct RouterHandle {
	runtime: Weak<RuntimeInner>,
	id: String,
}

impl std::fmt::Debug for RouterHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterHandle").field("id", &self.id).finish()
	}
}

impl RouterHandle {
	pub fn id(&self) -> &str {
		&self.id
	}

	fn runtime(&self) -> Result<Runtime, RuntimeError> {
		self.runtime
			.upgrade()
			.map(Runtime::from_inner)
			.ok_or_else(|| RuntimeError::UnknownRouter { id: self.id.clone() })
	}

	pub fn navigate(&self, path: &str) -> Result<NavigationOutcome, RuntimeError> {
		self.runtime()?.navigate(&self.id, path)
	}

	pub fn context(&self) -> Option<RouterContext> {
		self.runtime().ok()?.router_context(&self.id)
	}

	pub fn reverse(&self, pattern: &str, params: &RouteParams) -> Option<String> {
		self.runtime().ok()?.reverse(&self.id, pattern, params)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn route(pattern: &str) -> Route {
		let label = pattern.to_string();
		Route::new(pattern, move |_| label.clone())
	}

	#[rstest]
	#[case("/users/42", Some("/users/:id"))]
	#[case("/users/42/edit", Some("/users/*"))]
	#[case("/users/me", Some("/users/me"))]
	#[case("/teams", None)]
	fn test_match_prefers_specific_routes(#[case] path: &str, #[case] expected: Option<&str>) {
		let router = Router::new(
			RouterConfig::default(),
			vec![route("/users/*"), route("/users/:id"), route("/users/me")],
		);
		assert_eq!(
			router.match_route(path).map(|m| m.pattern),
			expected.map(str::to_string)
		);
	}

	#[rstest]
	fn test_ties_go_to_first_registered() {
		let router = Router::new(
			RouterConfig::default(),
			vec![route("/:section"), route("/:page")],
		);
		let matched = router.match_route("/docs").unwrap();
		assert_eq!(matched.index, 0);
		assert_eq!(matched.params["section"], "docs");
	}

	#[rstest]
	fn test_match_cache() {
		let router = Router::new(RouterConfig::default().cache(true), vec![route("/a")]);
		assert!(router.match_route("/a").is_some());
		assert!(router.match_route("/b").is_none());
		assert_eq!(router.match_cache.borrow().len(), 2);

		let uncached = Router::new(RouterConfig::default(), vec![route("/a")]);
		uncached.match_route("/a");
		assert!(uncached.match_cache.borrow().is_empty());
	}

	#[rstest]
	fn test_config_from_json() {
		let config: RouterConfig = serde_json::from_str(r#"{"container_id": "root"}"#).unwrap();
		assert_eq!(config, RouterConfig::default().container_id("root"));
	}
}
