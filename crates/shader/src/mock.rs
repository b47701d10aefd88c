//! Recording [`GpuContext`] for tests.
//!
//! Compilation fails when a source contains `syntax error`, linking fails
//! when either stage contains `link error`. Uniforms are whatever
//! `uniform <type> <name>;` lines the two stages declare.

use crate::backend::{GpuContext, ShaderStage, UniformValue};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLocation {
    pub program: u32,
    pub index: usize,
}

#[derive(Default)]
pub struct MockGpu {
    next_id: Cell<u32>,
    stages: RefCell<HashMap<u32, String>>,
    programs: RefCell<HashMap<u32, Vec<String>>>,
    pub deleted_programs: RefCell<Vec<u32>>,
    pub current: Cell<Option<u32>>,
    pub compile_calls: Cell<usize>,
    pub location_lookups: Cell<usize>,
    pub uploads: RefCell<Vec<(MockLocation, UniformValue)>>,
}

impl MockGpu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_programs(&self) -> HashSet<u32> {
        self.programs.borrow().keys().copied().collect()
    }

    pub fn live_stage_count(&self) -> usize {
        self.stages.borrow().len()
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| line.trim().strip_prefix("uniform "))
        .filter_map(|rest| rest.split_whitespace().nth(1))
        .map(|name| name.trim_end_matches(';').to_string())
        .collect()
}

impl GpuContext for MockGpu {
    type Stage = u32;
    type Program = u32;
    type Location = MockLocation;

    fn compile_stage(&self, stage: ShaderStage, source: &str) -> Result<u32, String> {
        self.compile_calls.set(self.compile_calls.get() + 1);
        if source.contains("syntax error") {
            return Err(format!("0:1({stage}): error: syntax error, unexpected token"));
        }
        let id = self.allocate();
        self.stages.borrow_mut().insert(id, source.to_string());
        Ok(id)
    }

    fn link_program(&self, vertex: u32, fragment: u32) -> Result<u32, String> {
        let stages = self.stages.borrow();
        let (Some(vs), Some(fs)) = (stages.get(&vertex), stages.get(&fragment)) else {
            return Err(String::from("link of deleted stage"));
        };
        if vs.contains("link error") || fs.contains("link error") {
            return Err(String::from("error: varying mismatch between stages"));
        }
        let mut uniforms = declared_uniforms(vs);
        for name in declared_uniforms(fs) {
            if !uniforms.contains(&name) {
                uniforms.push(name);
            }
        }
        drop(stages);
        let id = self.allocate();
        self.programs.borrow_mut().insert(id, uniforms);
        Ok(id)
    }

    fn delete_stage(&self, stage: u32) {
        self.stages.borrow_mut().remove(&stage);
    }

    fn delete_program(&self, program: u32) {
        self.programs.borrow_mut().remove(&program);
        self.deleted_programs.borrow_mut().push(program);
        if self.current.get() == Some(program) {
            self.current.set(None);
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.current.set(program);
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<MockLocation> {
        self.location_lookups.set(self.location_lookups.get() + 1);
        let programs = self.programs.borrow();
        let index = programs.get(&program)?.iter().position(|u| u == name)?;
        Some(MockLocation { program, index })
    }

    fn upload_uniform(&self, location: &MockLocation, value: UniformValue) {
        self.uploads.borrow_mut().push((*location, value));
    }
}
