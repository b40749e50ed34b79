use std::ffi::c_void;
use thiserror::Error;

pub struct GeometryBuilder<'a> {
    attributes: Vec<VertexAttribute>,
    data: &'a [f32],
    indices: Option<&'a [u32]>,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new(data: &'a [f32]) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            indices: None,
        }
    }

    /// Attributes are assigned locations 0, 1, ... in the order they are added.
    pub fn with_attribute(mut self, attr: VertexAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    fn validate(&self) -> Result<usize, GBError> {
        let total_len: usize = self.attributes.iter().map(|a| a.size()).sum();

        if total_len == 0 {
            return Err(GBError::NoAttributes);
        }

        if self.data.len() % total_len != 0 {
            return Err(GBError::InvalidDataLength);
        }

        let vertices = self.data.len() / total_len;

        if let Some(indices) = self.indices {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(GBError::IndexOutOfRange { index, vertices });
            }
        }

        Ok(total_len)
    }

    /// Needs a current context with loaded `gl` function pointers.
    pub fn build(self) -> Result<Geometry, GBError> {
        let total_len = self.validate()?;

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = None;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                std::mem::size_of_val(self.data) as isize,
                self.data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );

            let mut offset = 0;

            for (i, attr) in self.attributes.iter().enumerate() {
                gl::VertexAttribPointer(
                    i as u32,
                    attr.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    (total_len * std::mem::size_of::<f32>()) as i32,
                    (offset * std::mem::size_of::<f32>()) as *const c_void,
                );
                offset += attr.size();
                gl::EnableVertexAttribArray(i as u32);
            }

            if let Some(indices) = self.indices {
                let mut id = 0;
                gl::GenBuffers(1, (&mut id) as *mut u32);
                // element buffer binding is VAO state, keep it bound
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, id);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    std::mem::size_of_val(indices) as isize,
                    indices.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                );
                ebo = Some(id);
            }

            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindVertexArray(0);
        }

        let elements = match self.indices {
            Some(indices) => Elements::Indexed(indices.len()),
            None => Elements::Arrays(self.data.len() / total_len),
        };

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            elements,
        })
    }
}

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Invalid data length for given attributes")]
    InvalidDataLength,
    #[error("Geometry needs at least one attribute")]
    NoAttributes,
    #[error("Index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
}

#[derive(Copy, Clone, Debug)]
pub enum VertexAttribute {
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Elements {
    Arrays(usize),
    Indexed(usize),
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    elements: Elements,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn elements(&self) -> Elements {
        self.elements
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = &self.ebo {
                gl::DeleteBuffers(1, ebo as *const u32);
            }
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}
