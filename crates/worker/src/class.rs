/// Execution classes used to tag spawned preference work in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Forwarding of store changes into bindings; directly visible to consumers.
	Interactive,
	/// Durable writes that may lag behind the caller.
	Background,
	/// Blocking file I/O executed on the blocking pool.
	IoBlocking,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
			Self::IoBlocking => "io_blocking",
		}
	}
}
