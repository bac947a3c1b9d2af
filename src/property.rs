use std::{
    cell::{Ref, RefCell, RefMut},
    marker::PhantomData,
    ops::{Deref, DerefMut, Index, IndexMut},
    rc::{Rc, Weak},
};

use crate::{
    element::{EH, FH, HH, Handle, VH},
    error::Error,
};

/// Keeps every property buffer of one element type in lockstep with the arena
/// that owns the elements. Growing the arena grows all registered buffers.
pub(crate) struct PropertyContainer<H>
where
    H: Handle,
{
    props: Vec<Box<dyn GenericProperty>>,
    length: usize,
    _phantom: PhantomData<H>,
}

impl<H> PropertyContainer<H>
where
    H: Handle,
{
    pub fn new() -> Self {
        PropertyContainer {
            props: Vec::new(),
            length: 0,
            _phantom: PhantomData,
        }
    }

    fn register(&mut self, prop: Box<dyn GenericProperty>) {
        self.props.push(prop);
    }

    /**
     * Reserve memory to accomodate an additional `n` elements.
     */
    pub fn reserve(&mut self, n: usize) -> Result<(), Error> {
        for prop in self.props.iter_mut() {
            prop.reserve(n)?;
        }
        Ok(())
    }

    /// Append one default-initialized value to every registered buffer.
    pub fn push_value(&mut self) -> Result<(), Error> {
        for prop in self.props.iter_mut() {
            prop.push()?;
        }
        self.length += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.length
    }
}

trait GenericProperty {
    fn reserve(&mut self, n: usize) -> Result<(), Error>;

    fn push(&mut self) -> Result<(), Error>;
}

/// Buffer containing the property values.
///
/// This is a thin wrapper around a `Vec<T>` that allows type safe indexing
/// with the handle type `H`. It dereferences to a `&[T]` when raw indices are
/// more convenient.
pub struct PropBuf<H, T>
where
    H: Handle,
    T: Clone + Copy,
{
    buf: Vec<T>,
    _phantom: PhantomData<H>,
}

impl<H, T> Index<H> for PropBuf<H, T>
where
    H: Handle,
    T: Clone + Copy,
{
    type Output = T;

    fn index(&self, handle: H) -> &Self::Output {
        &self.buf[handle.index() as usize]
    }
}

impl<H, T> IndexMut<H> for PropBuf<H, T>
where
    H: Handle,
    T: Clone + Copy + 'static,
{
    fn index_mut(&mut self, h: H) -> &mut Self::Output {
        &mut self.buf[h.index() as usize]
    }
}

impl<H, T> Deref for PropBuf<H, T>
where
    H: Handle,
    T: Clone + Copy,
{
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl<H, T> DerefMut for PropBuf<H, T>
where
    H: Handle,
    T: Clone + Copy,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

/// A value of type `T` associated with every mesh element of handle type `H`.
///
/// A plain `Vec<T>` would drift out of sync with the mesh as elements are
/// added. A property is registered with the arena's container, so every
/// element, including ones added later, always has a value. Access goes
/// through runtime borrow checking; a failed borrow surfaces as
/// [`Error::BorrowedPropertyAccess`].
#[derive(Clone)]
pub struct Property<H, T>
where
    H: Handle,
    T: Clone + Copy,
{
    data: Rc<RefCell<PropBuf<H, T>>>,
    default: T,
}

impl<H, T> Property<H, T>
where
    H: Handle + 'static,
    T: Clone + Copy + 'static,
{
    pub(crate) fn new(container: &mut PropertyContainer<H>, default: T) -> Self {
        let prop = Property {
            data: Rc::new(RefCell::new(PropBuf {
                buf: vec![default; container.len()],
                _phantom: PhantomData,
            })),
            default,
        };
        container.register(prop.generic_ref());
        prop
    }

    fn generic_ref(&self) -> Box<dyn GenericProperty> {
        Box::new(WeakProperty::<H, T> {
            data: Rc::downgrade(&self.data),
            default: self.default,
        })
    }

    /// Try to borrow the property buffer with read-only access.
    pub fn try_borrow(&self) -> Result<Ref<'_, PropBuf<H, T>>, Error> {
        self.data
            .try_borrow()
            .map_err(|_| Error::BorrowedPropertyAccess)
    }

    /// Try to borrow the property buffer with mutable access.
    pub fn try_borrow_mut(&mut self) -> Result<RefMut<'_, PropBuf<H, T>>, Error> {
        self.data
            .try_borrow_mut()
            .map_err(|_| Error::BorrowedPropertyAccess)
    }

    /// Get the cloned property value of the mesh element `h`.
    pub fn get_cloned(&self, h: H) -> Result<T, Error> {
        let buf = self.try_borrow()?;
        Ok(buf[h])
    }

    /// Set the property value of the mesh element `h`.
    pub fn set(&mut self, h: H, val: T) -> Result<(), Error> {
        let mut buf = self.try_borrow_mut()?;
        buf[h] = val;
        Ok(())
    }
}

/// Vertex property. A value of type `T` is defined on each vertex of the mesh.
pub type VProperty<T> = Property<VH, T>;

/// Halfedge property. A value of type `T` is defined on each halfedge of the
/// mesh.
pub type HProperty<T> = Property<HH, T>;

/// Edge property. A value of type `T` is defined on each edge of the mesh.
pub type EProperty<T> = Property<EH, T>;

/// Face property. A value of type `T` is defined on each face of the mesh.
pub type FProperty<T> = Property<FH, T>;

/// This is what lives inside the property container. It doesn't control the
/// lifetime of the property, but grows the buffer whenever elements are added
/// to the mesh. If the owning property was dropped, it does nothing.
struct WeakProperty<H, T>
where
    H: Handle,
    T: Clone + Copy,
{
    data: Weak<RefCell<PropBuf<H, T>>>,
    default: T,
}

impl<H, T> GenericProperty for WeakProperty<H, T>
where
    H: Handle,
    T: Clone + Copy,
{
    fn reserve(&mut self, n: usize) -> Result<(), Error> {
        if let Some(prop) = self.data.upgrade() {
            prop.try_borrow_mut()
                .map_err(|_| Error::BorrowedPropertyAccess)?
                .buf
                .reserve(n);
        }
        Ok(())
    }

    fn push(&mut self) -> Result<(), Error> {
        if let Some(prop) = self.data.upgrade() {
            prop.try_borrow_mut()
                .map_err(|_| Error::BorrowedPropertyAccess)?
                .buf
                .push(self.default);
        }
        Ok(())
    }
}
