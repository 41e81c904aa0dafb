//! OBJ 文件加载器
//!
//! 自带的 Wavefront OBJ 解析器：把多边形汤描述（位置、法线、纹理坐标
//! 和按索引引用它们的多边形面）加载为渲染器可直接使用的三角形网格。
//!
//! # 特性
//!
//! - 在内存缓冲区上分词解析，宽容处理松散的行式文本格式
//! - 任意度数的面自动三角化（四边形对角线规则；5 顶点以上先投影到
//!   最佳拟合平面再做耳切三角化）
//! - 面顶点缺失法线时按输出三角形合成法线
//! - 按 (v, vt, vn) 索引三元组去重输出顶点
//!
//! # 错误处理
//!
//! 只有文件不存在/无法确定大小会作为 `FileNotFound` 传播给调用者。
//! 无法识别的关键字、缺失的可选字段等逐行问题被静默跳过或取默认值。
//! 对文件内悬空的索引引用不做越界校验（格式良好的文件不会出现），
//! 最终输出的网格在返回前做一次整体验证。

use super::tokenizer::Tokenizer;
use super::MeshLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::MeshData;
use crate::geometry::vertex::Vertex;
use crate::math::plane::project_to_best_fit_plane;
use crate::math::triangulate::{split_quad, triangulate_polygon};

use nalgebra::{Vector2, Vector3};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::path::Path;

/// 组合顶点键：`(位置索引, 纹理坐标索引, 法线索引)`
///
/// 两个键相等当且仅当三个分量都相等，这就是一个输出顶点的身份——
/// 两个面共享位置但纹理坐标或法线不同时，会产生两个独立的输出顶点
/// （硬边/接缝的标准处理方式）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct IndexedVert {
    v: u32,
    vt: u32,
    vn: u32,
}

// fasthash64 的单块简化版本 https://github.com/ztanml/fast-hash
// 键恰好装进两个 64 位字（一个作为数据，一个作为种子）。

const FASTHASH_M: u64 = 0x8803_55f2_1e6d_1965;

#[inline]
fn fasthash_mix(mut h: u64) -> u64 {
    h ^= h >> 23;
    h = h.wrapping_mul(0x2127_599b_f432_5c37);
    h ^= h >> 47;
    h
}

#[inline]
fn fasthash64(value: u64, seed: u64) -> u64 {
    let mut h = seed ^ FASTHASH_M.wrapping_mul(8);
    h ^= fasthash_mix(value);
    h = h.wrapping_mul(FASTHASH_M.wrapping_mul(FASTHASH_M));
    fasthash_mix(h)
}

impl Hash for IndexedVert {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let packed = (self.vt as u64) << 32 | self.v as u64;
        let seed = (self.vn as u64) << 32;
        state.write_u64(fasthash64(packed, seed));
    }
}

/// 直通 Hasher：键已经通过 fasthash64 充分混合，无需再次散列。
#[derive(Default)]
struct PrehashedHasher(u64);

impl Hasher for PrehashedHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = fasthash_mix(self.0 ^ b as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, v: u64) {
        self.0 = v;
    }
}

type VertexIndexMap = HashMap<IndexedVert, u32, BuildHasherDefault<PrehashedHasher>>;

/// 解析 `v[/t][/n]` 形式的面顶点字段
///
/// 位置索引必填；纹理坐标和法线索引可选，用 `/` 分隔，连续的 `/`
/// 表示字段省略。文件中的索引是 1 基的，解析时转为 0 基。
///
/// # 返回
///
/// 索引三元组和"法线字段是否存在"标志。
fn parse_face_vertex(field: &str) -> (IndexedVert, bool) {
    let mut vert = IndexedVert::default();
    let mut has_normal = false;

    let pos_end = field.find('/').unwrap_or(field.len());
    vert.v = field[..pos_end].parse::<u32>().unwrap_or(0).saturating_sub(1);

    if pos_end < field.len() {
        let rest = &field[pos_end + 1..];
        let tex_end = rest.find('/').unwrap_or(rest.len());

        if tex_end > 0 {
            vert.vt = rest[..tex_end].parse::<u32>().unwrap_or(0).saturating_sub(1);
        }

        if tex_end < rest.len() {
            let normal_field = &rest[tex_end + 1..];
            if !normal_field.is_empty() {
                vert.vn = normal_field.parse::<u32>().unwrap_or(0).saturating_sub(1);
                has_normal = true;
            }
        }
    }

    (vert, has_normal)
}

/// 把一个面的有序顶点环转换为三角形顶点列表（长度为 3 的倍数）
///
/// - 3 个顶点：原样输出
/// - 4 个顶点：按对角和规则选择分割对角线
/// - 5 个以上：投影到最佳拟合平面后做耳切三角化
fn triangulate_face(face_verts: &[IndexedVert], positions: &[Vector3<f32>]) -> Vec<IndexedVert> {
    match face_verts.len() {
        3 => face_verts.to_vec(),
        4 => {
            let tris = split_quad(
                &positions[face_verts[0].v as usize],
                &positions[face_verts[1].v as usize],
                &positions[face_verts[2].v as usize],
                &positions[face_verts[3].v as usize],
            );
            tris.iter()
                .flatten()
                .map(|&local| face_verts[local])
                .collect()
        }
        _ => {
            let points: Vec<Vector3<f32>> = face_verts
                .iter()
                .map(|vert| positions[vert.v as usize])
                .collect();
            let projected = project_to_best_fit_plane(&points);

            triangulate_polygon(&projected)
                .into_iter()
                .map(|local| face_verts[local as usize])
                .collect()
        }
    }
}

/// 为被标记的面按输出三角形合成法线
///
/// 每个三角形用两条边向量的归一化叉积计算一条面法线，追加为新的
/// 法线数组条目，由该三角形的三个角共享。三角化在前、合成在后，
/// 所以一个三角化后的 n 边形得到的是每个三角形一条法线，
/// 而不是整个原始面一条。
fn synthesize_normals(
    tri_verts: &mut [IndexedVert],
    positions: &[Vector3<f32>],
    normals: &mut Vec<Vector3<f32>>,
) {
    for tri in tri_verts.chunks_exact_mut(3) {
        let p0 = positions[tri[0].v as usize];
        let p1 = positions[tri[1].v as usize];
        let p2 = positions[tri[2].v as usize];

        let normal = (p1 - p0).cross(&(p2 - p0)).normalize();

        let index = normals.len() as u32;
        normals.push(normal);
        tri[0].vn = index;
        tri[1].vn = index;
        tri[2].vn = index;
    }
}

/// 在内存缓冲区上执行完整的 OBJ 解析
fn parse_obj(data: &[u8], name: Option<String>) -> Result<MeshData> {
    let mut positions: Vec<Vector3<f32>> = Vec::new();
    let mut normals: Vec<Vector3<f32>> = Vec::new();
    let mut texcoords: Vec<Vector2<f32>> = Vec::new();

    let mut face_verts: Vec<IndexedVert> = Vec::with_capacity(4);
    let mut vertex_indices = VertexIndexMap::default();

    let mut mesh = MeshData {
        vertices: Vec::new(),
        indices: Vec::new(),
        name,
    };

    let mut tokenizer = Tokenizer::new(data);

    while tokenizer.has_more() {
        let keyword = tokenizer.next_token(false);

        match keyword {
            // v <x> <y> <z> [<w>]
            "v" => {
                let mut x = tokenizer.next_token(false).parse::<f32>().unwrap_or(0.0);
                let mut y = tokenizer.next_token(false).parse::<f32>().unwrap_or(0.0);
                let mut z = tokenizer.next_token(false).parse::<f32>().unwrap_or(0.0);

                // 可选的齐次坐标权重
                let w_token = tokenizer.next_token(true);
                if !w_token.is_empty() {
                    let w = w_token.parse::<f32>().unwrap_or(0.0);
                    x /= w;
                    y /= w;
                    z /= w;
                }

                positions.push(Vector3::new(x, y, z));
            }
            // vn <nx> <ny> <nz>（不做归一化，原样保留文件中的值）
            "vn" => {
                let x = tokenizer.next_token(false).parse::<f32>().unwrap_or(0.0);
                let y = tokenizer.next_token(false).parse::<f32>().unwrap_or(0.0);
                let z = tokenizer.next_token(false).parse::<f32>().unwrap_or(0.0);
                normals.push(Vector3::new(x, y, z));
            }
            // vt <s> <t>
            "vt" => {
                let s = tokenizer.next_token(false).parse::<f32>().unwrap_or(0.0);
                let t = tokenizer.next_token(false).parse::<f32>().unwrap_or(0.0);
                texcoords.push(Vector2::new(s, t));
            }
            // f (<pi>[/<ti>][/<ni>])3+
            "f" => {
                face_verts.clear();
                let mut needs_normals = false;

                let mut field = tokenizer.next_token(true);
                while !field.is_empty() {
                    let (vert, has_normal) = parse_face_vertex(field);
                    if !has_normal {
                        // 任何一个顶点省略法线，整个面都走法线合成
                        needs_normals = true;
                    }
                    face_verts.push(vert);
                    field = tokenizer.next_token(true);
                }

                if face_verts.len() < 3 {
                    tracing::warn!(fields = face_verts.len(), "忽略顶点数不足的面语句");
                    tokenizer.to_next_line();
                    continue;
                }

                let mut tri_verts = triangulate_face(&face_verts, &positions);

                // 文件完全没有提供纹理坐标时，补一个默认 (0,0) 条目
                if texcoords.is_empty() {
                    texcoords.push(Vector2::zeros());
                }

                if needs_normals {
                    synthesize_normals(&mut tri_verts, &positions, &mut normals);
                }

                // 顶点去重：每个唯一的索引三元组只产生一个输出顶点
                for vert in &tri_verts {
                    match vertex_indices.entry(*vert) {
                        Entry::Occupied(entry) => mesh.indices.push(*entry.get()),
                        Entry::Vacant(entry) => {
                            let index = mesh.vertices.len() as u32;
                            mesh.vertices.push(Vertex::new(
                                positions[vert.v as usize].into(),
                                normals[vert.vn as usize].into(),
                                texcoords[vert.vt as usize].into(),
                            ));
                            mesh.indices.push(index);
                            entry.insert(index);
                        }
                    }
                }
            }
            // 材质库/材质引用/对象名/组名：消费参数，不保留任何场景图状态
            "mtllib" | "usemtl" | "o" | "g" => {
                let _ = tokenizer.next_token(true);
            }
            // 注释：跳过本行剩余内容
            comment if comment.starts_with('#') => {}
            // 其他关键字：忽略整行
            _ => {}
        }

        tokenizer.to_next_line();
    }

    mesh.validate().map_err(MeshLoadError::ValidationError)?;

    tracing::debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "OBJ 解析完成"
    );

    Ok(mesh)
}

/// OBJ 格式加载器
///
/// 实现 `MeshLoader` trait，提供 OBJ 文件的加载功能。
pub struct ObjLoader;

impl MeshLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<MeshData> {
        // 无法打开或无法确定大小的文件是唯一向调用者传播的失败
        let metadata = std::fs::metadata(path)
            .map_err(|_| MeshLoadError::FileNotFound(path.to_path_buf()))?;
        if !metadata.is_file() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let data =
            std::fs::read(path).map_err(|_| MeshLoadError::FileNotFound(path.to_path_buf()))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string());

        let mesh = parse_obj(&data, name)?;

        tracing::info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "成功加载 OBJ 文件"
        );

        Ok(mesh)
    }

    fn load_from_memory(data: &[u8]) -> Result<MeshData> {
        parse_obj(data, None)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}
