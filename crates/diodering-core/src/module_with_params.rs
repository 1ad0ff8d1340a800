//! Combined `Module` + `ParameterInfo` trait for boxed modules.
//!
//! [`ModuleWithParams`] provides prefixed parameter methods
//! (`module_param_count()`, `module_set_param()`, ...) dispatched through the
//! same vtable as [`Module`]. A blanket impl covers every type implementing
//! both traits, so the registry and offline hosts can hold a single
//! `Box<dyn ModuleWithParams + Send>`.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::module::Module;
use crate::param_info::{ParamDescriptor, ParameterInfo};

/// Parameter access on a boxed [`Module`].
pub trait ModuleWithParams: Module {
    /// Get the parameter count.
    fn module_param_count(&self) -> usize;

    /// Get parameter info by index.
    fn module_param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Get parameter value by index.
    fn module_get_param(&self, index: usize) -> f32;

    /// Set parameter value by index.
    fn module_set_param(&mut self, index: usize, value: f32);

    /// Find a parameter by name, short name or string ID.
    fn module_find_param(&self, name: &str) -> Option<usize>;

    /// Format a parameter value as display text.
    ///
    /// Returns `None` if the index is out of range.
    fn module_format_value(&self, index: usize, value: f32) -> Option<String>;

    /// Parse display text back to a parameter value.
    ///
    /// Returns `None` if the index is out of range or parsing fails.
    fn module_parse_value(&self, index: usize, text: &str) -> Option<f32>;
}

impl<T: Module + ParameterInfo> ModuleWithParams for T {
    fn module_param_count(&self) -> usize {
        self.param_count()
    }

    fn module_param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }

    fn module_get_param(&self, index: usize) -> f32 {
        self.get_param(index)
    }

    fn module_set_param(&mut self, index: usize, value: f32) {
        self.set_param(index, value)
    }

    fn module_find_param(&self, name: &str) -> Option<usize> {
        self.find_param_by_name(name)
    }

    fn module_format_value(&self, index: usize, value: f32) -> Option<String> {
        self.param_info(index).map(|desc| desc.format_value(value))
    }

    fn module_parse_value(&self, index: usize, text: &str) -> Option<f32> {
        self.param_info(index)
            .and_then(|desc| desc.parse_value(text))
    }
}
