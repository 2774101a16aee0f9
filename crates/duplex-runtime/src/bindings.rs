//! Names generated scripts use to reach the runtime.
//!
//! The code generator emits calls such as `duplex.reactiveComponent(id, fn)`;
//! a host binding layer exposes the matching [`Runtime`](crate::Runtime)
//! methods under these names.

/// Global object holding the runtime entry points.
pub const GLOBAL_NAMESPACE: &str = "duplex";

/// Mounts a reactive component on an element id.
pub const REACTIVE_COMPONENT: &str = "reactiveComponent";

pub const USE_STATE: &str = "useState";
pub const USE_EFFECT: &str = "useEffect";
pub const USE_REF: &str = "useRef";
pub const CREATE_CONTEXT: &str = "createContext";
pub const USE_CONTEXT: &str = "useContext";
pub const DELETE_CONTEXT: &str = "deleteContext";
pub const CREATE_ROUTER: &str = "createRouter";
pub const NAVIGATE: &str = "navigate";

/// Debug query returning a component's hook slots.
pub const GET_COMPONENT_STATE: &str = "__getComponentState";

/// Every entry point, in the order they are installed.
pub const ENTRY_POINTS: &[&str] = &[
	REACTIVE_COMPONENT,
	USE_STATE,
	USE_EFFECT,
	USE_REF,
	CREATE_CONTEXT,
	USE_CONTEXT,
	DELETE_CONTEXT,
	CREATE_ROUTER,
	NAVIGATE,
	GET_COMPONENT_STATE,
];

/// Fully qualified name of an entry point, e.g. `duplex.navigate`.
pub fn qualified(entry: &str) -> String {
	format!("{GLOBAL_NAMESPACE}.{entry}")
}
